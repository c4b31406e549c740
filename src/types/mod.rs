//! Domain types shared by the wizard, the collaborators and the REST layer.

mod role;
mod select;
mod session;
mod timesheet;

pub use role::{ClockInRoleType, ViewFlags, WorkRole};
pub use select::SelectOption;
pub use session::{Coordinates, Session};
pub use timesheet::{
    ActiveTimesheet, ClockInType, CreatedTimesheet, PreviousTimesheet, PreviousWork,
};
