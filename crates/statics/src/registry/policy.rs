/// How a registry treats a node whose name is already linked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
	/// Link it anyway. [`find`](super::Registry::find) returns the first match.
	#[default]
	Allow,
	/// Refuse to link it with [`RegistryError::DuplicateName`](crate::RegistryError::DuplicateName).
	Reject,
}
