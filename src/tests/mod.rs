pub mod scheduler_tests;
