//! Page components for the grievance console

mod dashboard;
mod login;
mod register;

pub use dashboard::Dashboard;
pub use login::Login;
pub use register::Register;
