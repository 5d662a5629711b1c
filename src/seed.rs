use crate::error::ServiceError;
use crate::models::{ImageList, PropertyPayload};
use crate::services::RowStore;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

const FIELDS_PHOTO: &str = "https://images.unsplash.com/photo-1500382017468-9049fed747ef?w=800";
const ROAD_PHOTO: &str = "https://images.unsplash.com/photo-1464082354059-27db6ce50048?w=800";
const VALLEY_PHOTO: &str = "https://images.unsplash.com/photo-1501785888041-af3ef285b470?w=800";

struct SampleRow {
    title: &'static str,
    location: &'static str,
    perch_price: f64,
    total_perches: f64,
    utilities: (bool, bool, bool),
    distance: &'static str,
    landmark: &'static str,
    agent: (&'static str, &'static str),
    description: &'static str,
    images: &'static [&'static str],
}

const UTHPALA: (&str, &str) = ("Uthpala", "+94 777 123 456");
const DINUSHIKA: (&str, &str) = ("Dinushika", "+94 777 234 567");
const CHANNA: (&str, &str) = ("Channa", "+94 777 345 678");

const SAMPLES: &[SampleRow] = &[
    SampleRow {
        title: "Premium Residential Land in Haragama",
        location: "Haragama",
        perch_price: 500_000.0,
        total_perches: 20.0,
        utilities: (true, true, true),
        distance: "5 km from Kandy City Center",
        landmark: "Near Dharmaraja College",
        agent: UTHPALA,
        description: "Beautiful land plot in the heart of Haragama with all utilities available. Perfect for residential construction with easy access to Kandy city. Clear title deed and peaceful neighborhood. Ideal for building your dream home.",
        images: &[FIELDS_PHOTO, ROAD_PHOTO],
    },
    SampleRow {
        title: "Scenic Plot with Mountain Views - Haragama",
        location: "Haragama",
        perch_price: 550_000.0,
        total_perches: 15.0,
        utilities: (true, true, false),
        distance: "6 km from Kandy",
        landmark: "Near Peradeniya Road",
        agent: UTHPALA,
        description: "Stunning land with panoramic mountain views. Water and electricity connected. Quiet location perfect for a peaceful family home. Easy access to main road and public transport.",
        images: &[FIELDS_PHOTO],
    },
    SampleRow {
        title: "Commercial Land Near Katugastota Town",
        location: "Katugastota",
        perch_price: 600_000.0,
        total_perches: 25.0,
        utilities: (true, true, true),
        distance: "4 km from Kandy City",
        landmark: "Near Katugastota Town Center",
        agent: DINUSHIKA,
        description: "Prime commercial land in the bustling Katugastota area. All utilities connected. Excellent for commercial development or mixed-use property. High foot traffic area with great business potential.",
        images: &[FIELDS_PHOTO, ROAD_PHOTO],
    },
    SampleRow {
        title: "Peaceful Residential Plot - Katugastota",
        location: "Katugastota",
        perch_price: 450_000.0,
        total_perches: 18.0,
        utilities: (true, true, true),
        distance: "5 km from Kandy",
        landmark: "Near Polgolla Reservoir",
        agent: DINUSHIKA,
        description: "Tranquil location with easy access to Polgolla Reservoir. All utilities available. Perfect for a serene family environment while being close to city amenities.",
        images: &[FIELDS_PHOTO],
    },
    SampleRow {
        title: "University Area Premium Land - Peradeniya",
        location: "Peradeniya",
        perch_price: 650_000.0,
        total_perches: 22.0,
        utilities: (true, true, true),
        distance: "3 km from Kandy City",
        landmark: "Near University of Peradeniya",
        agent: CHANNA,
        description: "Exceptional property close to the University of Peradeniya. All utilities connected. High potential for appreciation. Ideal for residential or rental investment targeting university community.",
        images: &[FIELDS_PHOTO, ROAD_PHOTO, VALLEY_PHOTO],
    },
    SampleRow {
        title: "Botanical Garden Vicinity Land - Peradeniya",
        location: "Peradeniya",
        perch_price: 700_000.0,
        total_perches: 30.0,
        utilities: (true, true, true),
        distance: "4 km from Kandy",
        landmark: "Near Royal Botanical Gardens",
        agent: CHANNA,
        description: "Premium land plot near the famous Royal Botanical Gardens. Larger plot perfect for a spacious home or subdivision. All modern utilities available. Excellent investment opportunity in a rapidly developing area.",
        images: &[FIELDS_PHOTO],
    },
    SampleRow {
        title: "Corner Plot with Road Access - Haragama",
        location: "Haragama",
        perch_price: 475_000.0,
        total_perches: 12.0,
        utilities: (true, true, false),
        distance: "5.5 km from Kandy",
        landmark: "Near Haragama Junction",
        agent: UTHPALA,
        description: "Excellent corner plot with dual road access. Water and electricity ready. Compact size ideal for a modern home. Great connectivity to Kandy city and surrounding areas.",
        images: &[FIELDS_PHOTO],
    },
    SampleRow {
        title: "Elevated Land with Valley View - Katugastota",
        location: "Katugastota",
        perch_price: 520_000.0,
        total_perches: 16.0,
        utilities: (false, true, true),
        distance: "6 km from Kandy",
        landmark: "Near Katugastota Hill",
        agent: DINUSHIKA,
        description: "Elevated land offering stunning valley views. Electricity and telephone connections available. Water line nearby (can be easily connected). Perfect for those seeking a hillside retreat close to the city.",
        images: &[FIELDS_PHOTO, VALLEY_PHOTO],
    },
    SampleRow {
        title: "River Frontage Land - Peradeniya",
        location: "Peradeniya",
        perch_price: 750_000.0,
        total_perches: 28.0,
        utilities: (true, true, true),
        distance: "3.5 km from Kandy",
        landmark: "Along Mahaweli River",
        agent: CHANNA,
        description: "Rare opportunity! Beautiful land with Mahaweli River frontage. All utilities connected. Perfect for a luxury residence with natural water features. Serene environment with excellent development potential.",
        images: &[FIELDS_PHOTO, ROAD_PHOTO],
    },
    SampleRow {
        title: "Affordable Starter Plot - Haragama",
        location: "Haragama",
        perch_price: 425_000.0,
        total_perches: 10.0,
        utilities: (true, true, true),
        distance: "6 km from Kandy",
        landmark: "Near Haragama Market",
        agent: UTHPALA,
        description: "Perfect starter plot for first-time home builders. All utilities connected. Compact size means affordable construction costs. Close to local amenities and good transport links to Kandy.",
        images: &[FIELDS_PHOTO],
    },
];

impl SampleRow {
    fn payload(&self) -> PropertyPayload {
        let (has_water, has_electricity, has_telephone) = self.utilities;
        PropertyPayload {
            title: self.title.to_string(),
            location: self.location.to_string(),
            perch_price: Some(self.perch_price),
            total_perches: Some(self.total_perches),
            has_water,
            has_electricity,
            has_telephone,
            distance_to_kandy: Some(self.distance.to_string()),
            landmark: Some(self.landmark.to_string()),
            agent_name: self.agent.0.to_string(),
            agent_phone: self.agent.1.to_string(),
            images: ImageList::from_items(self.images),
            description: self.description.to_string(),
            video_url: None,
            tour_360_url: None,
        }
    }
}

/// The fixed set of demo listings
pub fn sample_properties() -> Vec<PropertyPayload> {
    SAMPLES.iter().map(SampleRow::payload).collect()
}

/// Outcome of a seeding run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeedReport {
    /// Rows present before seeding
    pub existing: u64,
    pub succeeded: usize,
    pub failed: usize,
    /// Inserted ids, in insertion order
    pub inserted: Vec<String>,
}

impl SeedReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Count of sample rows per key, e.g. per location or per agent
pub fn tally<'a>(
    rows: &'a [PropertyPayload],
    key: impl Fn(&'a PropertyPayload) -> &'a str,
) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
}

/// Check the table is reachable, then insert each row in order. Per-row
/// failures are counted, not fatal; existing rows are never touched.
pub async fn seed(store: &dyn RowStore, rows: &[PropertyPayload]) -> Result<SeedReport, ServiceError> {
    info!("🌱 Preparing to insert {} properties", rows.len());

    let existing = store.count(None).await.map_err(|e| {
        error!("Error accessing properties table: {}", e);
        e
    })?;
    info!("✅ Connected, {} properties currently in the table", existing);
    if existing > 0 {
        warn!("Table already contains properties; new rows will be added alongside them");
    }

    let mut report = SeedReport {
        existing,
        ..Default::default()
    };

    for (i, row) in rows.iter().enumerate() {
        info!("[{}/{}] Adding: {}", i + 1, rows.len(), row.title);
        match store.insert(None, row).await {
            Ok(stored) => {
                info!("   ✅ Success (ID: {})", stored.id);
                report.inserted.push(stored.id);
                report.succeeded += 1;
            }
            Err(e) => {
                error!("   ❌ Error: {}", e);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
