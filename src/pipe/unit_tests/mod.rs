#[cfg(test)]
mod execute_tests;
