mod command_tests;
mod ha_tests;
mod node_tests;
mod storage_tests;
mod vm_tests;
