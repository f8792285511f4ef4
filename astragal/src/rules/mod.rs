pub mod comparison;
pub mod guards;
pub mod options;
pub mod params;
pub mod record;
