// Test modules for Butler
// Each module tests the corresponding source module

mod support;

mod tui_tests;
