pub mod dates;
pub mod error;
pub mod focus;
pub mod month_grid;
pub mod selection;
pub mod selector;

pub use dates::CalendarDate;
pub use error::PickerError;
pub use focus::{FocusMove, FocusNavigator};
pub use month_grid::{generate, CellContext, DayCell, MonthView};
pub use selection::{Range, SelectionController};
