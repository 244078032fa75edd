//! different utility modules used throughout the project
/// tiny module to set up logging and save sampled values into csv files
pub mod logger;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
/// typed engine task built from a parsed document, runs the expression pipeline
pub mod task;
