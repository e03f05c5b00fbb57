//! Declarative shapes shared by the single-field dialects.

/// A dialect whose only field is a verbatim string: `[name, value]`.
macro_rules! text_tag {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $field:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $ty {
            pub $field: String,
        }

        impl $ty {
            pub fn new(value: impl Into<String>) -> Self {
                Self { $field: value.into() }
            }
        }

        impl $crate::tag::TagCodec for $ty {
            const NAME: &'static str = $name;

            fn parse(tag: &$crate::tag::Tag) -> Option<Self> {
                $crate::tag::required(tag, Self::NAME, 2, 1).map(Self::new)
            }

            fn assemble(&self) -> $crate::tag::Tag {
                $crate::tag::Tag::new([Self::NAME, self.$field.as_str()])
            }
        }

        $crate::memory::impl_memory_size!($ty { $field });
    };
}

/// A dialect whose only field is a canonically written integer.
macro_rules! number_tag {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $field:ident: $num:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $ty {
            pub $field: $num,
        }

        impl $ty {
            pub const fn new(value: $num) -> Self {
                Self { $field: value }
            }
        }

        impl $crate::tag::TagCodec for $ty {
            const NAME: &'static str = $name;

            fn parse(tag: &$crate::tag::Tag) -> Option<Self> {
                $crate::tag::required(tag, Self::NAME, 2, 1)
                    .and_then($crate::tag::canonical_number::<$num>)
                    .map(Self::new)
            }

            fn assemble(&self) -> $crate::tag::Tag {
                $crate::tag::Tag::new([Self::NAME.to_string(), self.$field.to_string()])
            }
        }

        $crate::memory::impl_memory_size!($ty { $field });
    };
}
