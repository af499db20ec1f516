// Application layer - Fetch interface, assembly and report use case
pub mod air_quality_client;
pub mod report_service;
pub mod table_assembler;
