pub mod support;

pub mod normalize_tests;
