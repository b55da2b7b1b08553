pub mod contour;
pub mod flood;
pub mod health;
pub mod imagery;
pub mod reports;

pub use contour::fetch_contour_lines;
pub use flood::{flood_difference, flood_mapping};
pub use health::health_check;
pub use imagery::flood_mapping_image;
pub use reports::{create_report, location_mappings};
