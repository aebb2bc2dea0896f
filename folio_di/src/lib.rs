//! Minimal compile-time dependency injection.
//!
//! Services derive [`Build`] and are assembled by a provider declared with the
//! [`provider!`] macro. Every built value is cached per provider, so a service
//! requested twice is shared instead of constructed twice.

#[cfg(test)]
extern crate self as folio_di;

pub use cache::BuildCache;
pub use folio_di_derive::Build;

mod cache;
mod macros;

pub trait Provider: Sized {
    fn cache(&mut self) -> &mut BuildCache;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}
