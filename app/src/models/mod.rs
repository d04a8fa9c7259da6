// bakehouse/app/src/models/mod.rs

//! Row types mirroring the database tables, plus the JSON views built from them.

pub mod attendance;
pub mod cart_item;
pub mod category;
pub mod expense;
pub mod order;
pub mod order_item;
pub mod payment_method;
pub mod product;
pub mod profile;
pub mod schedule;
pub mod size;

pub use attendance::{AttendanceOverviewRow, AttendanceRecord, AttendanceView};
pub use cart_item::{CartItem, CartLineRow, CartLineView};
pub use category::Category;
pub use expense::Expense;
pub use order::{Order, OrderWithItems};
pub use order_item::OrderItem;
pub use payment_method::PaymentMethod;
pub use product::Product;
pub use profile::Profile;
pub use schedule::Schedule;
pub use size::Size;
