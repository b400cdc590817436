//! Zero-value defaults for primitive scalars
//!
//! Primitives have no dependencies, so a request for one returns the type's
//! zero value directly without consulting the registry.

use crate::injectable::Resolvable;
use crate::shape::Instance;
use std::{any::TypeId, rc::Rc};

macro_rules! primitive_defaults {
    ($($ty:ty => $zero:expr,)*) => {
        $(impl Resolvable for $ty {})*

        pub(crate) fn default_value(id: &TypeId) -> Option<Instance> {
            $(
                if *id == TypeId::of::<$ty>() {
                    let zero: $ty = $zero;
                    return Some(Rc::new(Rc::new(zero)) as Instance);
                }
            )*
            None
        }
    };
}

primitive_defaults! {
    i8 => 0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
    i128 => 0,
    isize => 0,
    u8 => 0,
    u16 => 0,
    u32 => 0,
    u64 => 0,
    u128 => 0,
    usize => 0,
    f32 => 0.0,
    f64 => 0.0,
    bool => false,
    char => '\0',
}
