// Storage test module
#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod local_tests;
