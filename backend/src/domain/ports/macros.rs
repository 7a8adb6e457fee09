//! Helper macro for declaring driven-port error enums.
//!
//! Each generated enum derives `thiserror::Error` and gains one snake_case
//! constructor per variant whose fields accept anything convertible into the
//! field type, so adapters can write `PostRepositoryError::query("boom")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unreachable => "store unreachable",
            Query { message: String } => "query failed: {message}",
            Stale { expected: u32, actual: u32 } => "stale: {expected} vs {actual}",
        }
    }

    #[test]
    fn unit_variant_constructor() {
        assert_eq!(SamplePortError::unreachable().to_string(), "store unreachable");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(
            SamplePortError::query("timeout").to_string(),
            "query failed: timeout"
        );
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = SamplePortError::stale(3_u32, 4_u32);
        assert_eq!(
            err,
            SamplePortError::Stale {
                expected: 3,
                actual: 4
            }
        );
    }
}
