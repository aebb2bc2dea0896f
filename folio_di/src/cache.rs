use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

/// Values a provider has already built, one per type.
#[derive(Debug, Default)]
pub struct BuildCache {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl BuildCache {
    pub fn cached<T: Clone + 'static>(&self) -> Option<T> {
        self.values
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
            .cloned()
    }

    pub fn store<T: 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }
}
