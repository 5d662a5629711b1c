pub mod cloudinary;
pub mod supabase;
pub mod traits;
pub mod types;

pub use cloudinary::CloudinaryHost;
pub use supabase::SupabaseClient;
pub use traits::{AuthService, MediaHost, RowStore, ServiceResult};
pub use types::UploadFile;
