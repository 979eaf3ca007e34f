/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The node is already a member of a registry.
	#[error("static global {name:?} is already linked")]
	AlreadyLinked { name: &'static str },

	/// The registry rejects duplicate names and one is already linked.
	#[error("static global {name:?} is already registered")]
	DuplicateName { name: &'static str },
}
