//! Newtype IDs for type-safe entity references.
//!
//! Every entity key is a distinct wrapper around the `SERIAL` i32 Postgres
//! assigns, so a `StoreId` cannot be passed where a `ProductId` is expected.

/// Define an i32-backed ID newtype.
///
/// The generated type is `Copy` and serde-transparent (serializes as a bare
/// number). With the `postgres` feature it also binds and decodes as `INT4`
/// via sqlx's transparent derive.
///
/// ```rust
/// # use retail_radar_core::define_id;
/// define_id! {
///     /// Key of a demo row.
///     DemoId
/// }
///
/// let id = DemoId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[doc = concat!("Wrap a raw database key as a `", stringify!($name), "`.")]
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database key.
            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::convert::From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Key of an `app_user` row (customers and store owners share the table).
    UserId
}

define_id! {
    /// Key of a `store` row.
    StoreId
}

define_id! {
    /// Key of a `product` row.
    ProductId
}

define_id! {
    /// Key of a `customer_order` row.
    OrderId
}

define_id! {
    /// Key of an `order_item` row.
    OrderItemId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_i32() {
        let id = StoreId::new(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(StoreId::from(42), id);
    }

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(ProductId::new(7).to_string(), "7");
    }

    #[test]
    fn test_serde_transparent() {
        let id = OrderId::new(99);
        assert_eq!(serde_json::to_string(&id).unwrap(), "99");

        let parsed: OrderId = serde_json::from_str("99").unwrap();
        assert_eq!(parsed, id);
    }
}
