pub(crate) mod session_key;
