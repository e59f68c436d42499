mod tests_options;
