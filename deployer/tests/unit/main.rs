//! Unit tests driven through the public API

mod test_reconciler;
