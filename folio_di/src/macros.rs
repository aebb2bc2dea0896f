/// Declare a provider that owns the given values.
///
/// Every listed type can then be built from the provider (by cloning the
/// owned value), and so can every type deriving `Build` whose fields are
/// buildable. The generated `new` takes the values in declaration order.
#[macro_export]
macro_rules! provider {
    ($(#[$meta:meta])* $vis:vis $ident:ident { $( $field:ident: $ty:ty ),* $(,)? }) => {
        $(#[$meta])*
        $vis struct $ident {
            cache: $crate::BuildCache,
            $( $field: $ty, )*
        }

        impl $ident {
            #[allow(clippy::too_many_arguments, reason = "one argument per provided value")]
            $vis fn new($( $field: $ty ),*) -> Self {
                Self {
                    cache: ::core::default::Default::default(),
                    $( $field, )*
                }
            }
        }

        impl $crate::Provider for $ident {
            fn cache(&mut self) -> &mut $crate::BuildCache {
                &mut self.cache
            }
        }

        $(
            impl $crate::Build<$ident> for $ty {
                fn build(provider: &mut $ident) -> Self {
                    ::core::clone::Clone::clone(&provider.$field)
                }
            }
        )*
    };
}
