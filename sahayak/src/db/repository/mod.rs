mod disease_reports;
mod soil_reports;
mod users;

pub use disease_reports::DiseaseReportRepository;
pub use soil_reports::SoilReportRepository;
pub use users::UserRepository;
