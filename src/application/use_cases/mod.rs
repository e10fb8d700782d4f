pub mod audit;
pub mod company;
pub mod company_user;
pub mod dashboard;
pub mod inquiry;
pub mod ticket;
