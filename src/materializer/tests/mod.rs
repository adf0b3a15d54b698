mod project_tests;
