/// Helper macro for upgrading a weak type reference that the registry keeps alive
///
/// Every `JvmTypeRef` handed out by the registry points at a type the registry owns, so a failed
/// upgrade means the registry was dropped while references were still in use.
///
/// ```rust, ignore
///  let base = upgrade!(type_ref)?;
/// ```
macro_rules! upgrade {
    ($type_ref:expr) => {
        $type_ref
            .upgrade()
            .ok_or_else(|| crate::Error::TypeError("Type reference is no longer alive".to_string()))
    };
}
