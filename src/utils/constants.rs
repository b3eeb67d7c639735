/// Shapefile attribute names used by NWIS station exports
pub const STATION_ID_FIELD: &str = "site_no";
pub const LATITUDE_FIELD: &str = "dec_lat_va";
pub const LONGITUDE_FIELD: &str = "dec_long_v";

/// File names
pub const STATIONS_SHAPEFILE: &str = "Shapefile_Stations.shp";
pub const PARAMETER_REFERENCE_FILE: &str = "parameter_cd_query.csv";
pub const DEFAULT_CONFIG_FILE: &str = "nwis.toml";

/// Cache file names
pub const COMBINED_CACHE_FILE: &str = "processed_station_data.json";
pub const DV_CACHE_FILE: &str = "processed_station_data_dv.json";
pub const IR_CACHE_FILE: &str = "processed_station_data_ir.json";

/// Filename grammar tokens
pub const STATION_TOKEN: &str = "station";
pub const PARAMETER_TOKEN: &str = "parameter";
pub const WATER_QUALITY_TOKEN: &str = "WaterQualityData";
pub const CSV_EXTENSION: &str = ".csv";
pub const MIN_FILENAME_SEGMENTS: usize = 4;

/// Expected series columns
pub const DV_TIMESTAMP_COLUMN: &str = "datetimeUTC";
pub const IR_DATE_COLUMN: &str = "Activity_StartDate";
pub const IR_RESULT_COLUMN: &str = "Result_Measure";

/// Parameter reference table columns
pub const PARAMETER_CODE_COLUMN: &str = "parm_cd";
pub const PARAMETER_NAME_COLUMN: &str = "parm_nm";

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "NWIS";
