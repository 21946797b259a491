//! Domain metadata and constants
//!
//! Built-in allowlists used when checking entity references. The settings file
//! can replace any of these lists; the values below describe the deployment the
//! validator ships with (Huawei Solar, Aquarea, RCE PSE and weather integrations).

/// Domains owned by integrations outside the configuration corpus.
///
/// References into these domains are never checked against local declarations.
pub static EXTERNAL_DOMAINS: &[&str] = &[
    "sun",
    "weather",
    "person",
    "zone",
    "device_tracker",
    "huawei_solar",
    "climate",
    "water_heater",
    "switch",
    "number",
    "select",
    "button",
    "automation",
    "script",
    "persistent_notification",
    "notify",
    "telegram_bot",
    "pyscript",
    "shell_command",
    "homeassistant",
];

/// Entities provided by integrations that the corpus references by name.
pub static KNOWN_EXTERNAL_ENTITIES: &[&str] = &[
    // Huawei Solar
    "sensor.akumulatory_stan_pojemnosci",
    "sensor.akumulatory_moc_ladowania_rozladowania",
    "sensor.falownik_moc_wyjsciowa_aktywna",
    "sensor.meter_active_power",
    "sensor.prognoza_pv_dzisiaj",
    "sensor.prognoza_pv_jutro",
    "sensor.energia_z_pv_dzisiaj",
    "sensor.energia_z_sieci_dzisiaj",
    "sensor.energia_do_sieci_dzisiaj",
    "sensor.energia_z_baterii_dzisiaj",
    "sensor.energia_do_baterii_dzisiaj",
    "sensor.zuzycie_energii_dzisiaj",
    "sensor.inverter_internal_temperature",
    "sensor.battery_temperature",
    "number.batteries_maximum_charging_power",
    "number.batteries_end_of_charge_soc",
    "number.batteries_end_of_discharge_soc",
    "number.batteries_grid_charge_cutoff_soc",
    "select.batteries_working_mode",
    "switch.batteries_force_charge_discharge",
    "switch.batteries_forcible_charge",
    "switch.batteries_forcible_discharge",
    "button.batteries_wakeup",
    // Aquarea (Panasonic)
    "climate.bodynek_nb_zone_1",
    "water_heater.bodynek_nb_tank",
    "switch.bodynek_nb_wymus_c_w_u",
    "sensor.bodynek_nb_temperatura_zewnetrzna",
    // RCE PSE
    "sensor.rce_pse_cena",
    "sensor.rce_pse_cena_jutro",
    // Weather
    "sensor.temperatura_zewnetrzna",
    "weather.home",
    // System
    "sun.sun",
    "persistent_notification.create",
    "automation.battery_algorithm_decision",
];

/// Parameter declaration files and the domain each one declares entities under.
pub static PARAMETER_SOURCES: &[(&str, &str)] = &[
    ("input_numbers.yaml", "input_number"),
    ("input_boolean.yaml", "input_boolean"),
    ("input_text.yaml", "input_text"),
    ("input_select.yaml", "input_select"),
];

/// Domain of entities declared under a template block's `sensor` key
pub const SENSOR_DOMAIN: &str = "sensor";

/// Domain of entities declared under a template block's `binary_sensor` key
pub const BINARY_SENSOR_DOMAIN: &str = "binary_sensor";
