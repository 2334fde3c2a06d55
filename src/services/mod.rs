pub(crate) mod hangul_search;
pub(crate) mod snapshot_service;
