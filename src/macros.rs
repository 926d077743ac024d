#![allow(unused_macros)]

/// Helper macro for reading locked items
///
/// ```rust, ignore
///  let serializer = read_lock!(self.serializer);
///  serializer(set)
/// ```
macro_rules! read_lock {
    ($arc_rwlock:expr) => {
        $arc_rwlock.read().expect("Failed to acquire read lock")
    };
}

/// Helper macro for writing to locked items
///
/// ```rust, ignore
///  let mut serializer = write_lock!(self.serializer);
///  *serializer = Arc::new(custom);
/// ```
macro_rules! write_lock {
    ($arc_rwlock:expr) => {
        $arc_rwlock.write().expect("Failed to acquire write lock")
    };
}

/// Helper macro for building a [`crate::Error::TypeMismatch`] from two printable type names
///
/// ```rust, ignore
///  return Err(type_mismatch!(member.member_type().name(), "<unknown>"));
/// ```
macro_rules! type_mismatch {
    ($expected:expr, $actual:expr) => {
        crate::Error::TypeMismatch {
            expected: $expected.to_string(),
            actual: $actual.to_string(),
        }
    };
}
