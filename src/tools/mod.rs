// Browser seam
pub mod session;

// Pipeline stages
pub mod enrich;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod paginate;
