pub mod campaigns;
pub mod delivery;
pub mod imports;
pub mod pages;
pub mod sections;
