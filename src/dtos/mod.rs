pub mod analyze_dtos;
