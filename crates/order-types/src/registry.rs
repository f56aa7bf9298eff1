//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Each pluggable implementation (storage backend, connector) provides a
/// `Registry` struct declaring the name it is referenced by in the
/// configuration and the factory that builds it, for example:
/// - "memory" for `[storage.implementations.memory]`
/// - "http" for `[connector.implementations.http]`
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
