mod monitor_tests;

mod utils;
