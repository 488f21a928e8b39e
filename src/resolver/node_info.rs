//! The resolution cascade for one inspected memory value

use super::name::correct_array_suffix;
use super::TypeInfoResolver;
use crate::core::types::Address;
use crate::memory::RemoteMemory;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// Prefix for names found one pointer hop away
pub const POINTER_PREFIX: &str = "Ptr -> ";

/// Prefix for names found through a weak reference cell
pub const WEAK_POINTER_PREFIX: &str = "WeakPtr -> ";

/// Which branch of the cascade produced a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "name", rename_all = "snake_case")]
pub enum Resolution {
    /// The value itself is an object with a type-getter stub
    Direct(String),
    /// The value points at such an object
    Pointer(String),
    /// The value points just past a weak reference cell
    WeakPointer(String),
    /// Descriptor pointer found at a fixed offset inside the object
    TypeInfoOffset(String),
}

impl Resolution {
    /// The resolved type name without provenance
    pub fn name(&self) -> &str {
        match self {
            Resolution::Direct(name)
            | Resolution::Pointer(name)
            | Resolution::WeakPointer(name)
            | Resolution::TypeInfoOffset(name) => name,
        }
    }

    /// Short label of the branch, used in logs and JSON output
    pub fn strategy(&self) -> &'static str {
        match self {
            Resolution::Direct(_) => "direct",
            Resolution::Pointer(_) => "pointer",
            Resolution::WeakPointer(_) => "weak_pointer",
            Resolution::TypeInfoOffset(_) => "type_info_offset",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Direct(name) | Resolution::TypeInfoOffset(name) => f.write_str(name),
            Resolution::Pointer(name) => write!(f, "{}{}", POINTER_PREFIX, name),
            Resolution::WeakPointer(name) => write!(f, "{}{}", WEAK_POINTER_PREFIX, name),
        }
    }
}

impl TypeInfoResolver {
    /// Annotation string for a memory value, or `None` when nothing matched
    pub fn resolve_node_info<M: RemoteMemory + ?Sized>(
        &self,
        value: Address,
        mem: &M,
    ) -> Option<String> {
        self.resolve(value, mem).map(|resolution| resolution.to_string())
    }

    /// Run the cascade; the first branch that yields a name wins
    #[tracing::instrument(level = "trace", skip_all, fields(value = %value))]
    pub fn resolve<M: RemoteMemory + ?Sized>(&self, value: Address, mem: &M) -> Option<Resolution> {
        if !self.config.is_plausible(value) {
            trace!("value implausible");
            return None;
        }

        let resolution = self
            .resolve_pointer_info(value, mem)
            .map(Resolution::Direct)
            .or_else(|| self.resolve_indirect(value, mem))
            .or_else(|| self.resolve_type_info_offset(value, mem))?;

        debug!(value = %value, strategy = resolution.strategy(), name = resolution.name(), "resolved");
        Some(resolution)
    }

    /// One pointer hop, then the weak reference cell before the pointee
    fn resolve_indirect<M: RemoteMemory + ?Sized>(
        &self,
        value: Address,
        mem: &M,
    ) -> Option<Resolution> {
        let indirect = self.deref(value, mem, "indirect")?;

        if let Some(name) = self.resolve_pointer_info(indirect, mem) {
            return Some(Resolution::Pointer(name));
        }

        if !self.config.weak_pointer {
            return None;
        }
        let target = self.weak_pointer_target(indirect, mem)?;
        self.resolve_pointer_info(target, mem)
            .map(Resolution::WeakPointer)
    }

    /// Weak references store the payload pointer one slot before the observed pointer
    pub fn weak_pointer_target<M: RemoteMemory + ?Sized>(
        &self,
        indirect: Address,
        mem: &M,
    ) -> Option<Address> {
        let cell = indirect.wrapping_sub(self.config.pointer_size());
        if !self.config.is_plausible(cell) {
            trace!(cell = %cell, "weak cell implausible");
            return None;
        }
        self.deref(cell, mem, "weak target")
    }

    /// Structural fallback: descriptor pointer at a fixed offset, limited to the module window
    fn resolve_type_info_offset<M: RemoteMemory + ?Sized>(
        &self,
        value: Address,
        mem: &M,
    ) -> Option<Resolution> {
        let type_info = self.deref(value.wrapping_add(self.config.type_info_offset), mem, "type info")?;

        if !self.config.module_window.contains(type_info) {
            trace!(type_info = %type_info, window = %self.config.module_window, "type info outside module window");
            return None;
        }

        let name = self.read_type_name(type_info, mem)?;
        Some(Resolution::TypeInfoOffset(correct_array_suffix(&name)))
    }
}
