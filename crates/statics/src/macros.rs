/// Declares named globals whose construction is deferred to
/// [`StaticGlobals::init`](crate::StaticGlobals::init).
///
/// Each declaration reserves storage as a `static`, wraps it in a
/// [`StaticGlobal`](crate::StaticGlobal) and submits the node so it is
/// registered while the program loads. The constructor must coerce to
/// `fn() -> T`: a function path or a non-capturing closure.
///
/// ```ignore
/// xeno_statics::static_global! {
/// 	/// Interned keyword table.
/// 	pub static KEYWORDS: Vec<&'static str> = "keywords" => || vec!["let", "fn"];
/// }
/// ```
///
/// Declarations inside a function body are block-scope globals: they are
/// registered like any other and share the same lifecycle.
#[macro_export]
macro_rules! static_global {
	($(
		$(#[$attr:meta])*
		$vis:vis static $ident:ident: $ty:ty = $name:literal => $ctor:expr;
	)+) => {$(
		$(#[$attr])*
		$vis static $ident: $crate::StaticGlobal<$ty> = {
			static STORAGE: $crate::Storage<$ty> = $crate::Storage::new($ctor);
			$crate::StaticGlobal::new($name, ::core::module_path!(), &STORAGE)
		};

		$crate::inventory::submit! { $crate::StaticNodeReg($ident.node()) }
	)+};
}
