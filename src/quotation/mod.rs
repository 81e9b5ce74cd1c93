mod line_item;
mod model;
mod number;

pub use line_item::{ItemField, LineItem};
pub use model::{HeaderField, Quotation};
pub use number::{format_money, parse_number, round2};
