//! Extended test suites
//!
//! 扩展测试套件

mod spsc;
