mod implementor;
mod item;
mod kind;

pub use self::implementor::{Implementor, Target};
pub use self::item::ItemRef;
pub use self::kind::ItemKind;
