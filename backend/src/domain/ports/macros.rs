//! `define_port_error!` generates a port error enum, its `thiserror` display
//! strings and one snake_case constructor per variant. String-like fields
//! accept anything `Into<String>`, so adapters can write
//! `UserPersistenceError::query("lookup failed")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
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
        pub enum SampleError {
            Offline => "store offline",
            Rejected { reason: String } => "rejected: {reason}",
            Throttled { reason: String, retry_after: u64 } => "throttled: {reason} ({retry_after}s)",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SampleError::offline(), SampleError::Offline);
        assert_eq!(SampleError::offline().to_string(), "store offline");
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = SampleError::rejected("bad key");
        assert_eq!(err.to_string(), "rejected: bad key");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SampleError::throttled(String::from("busy"), 3_u64);
        assert_eq!(
            err,
            SampleError::Throttled {
                reason: "busy".to_owned(),
                retry_after: 3
            }
        );
        assert_eq!(err.to_string(), "throttled: busy (3s)");
    }
}
