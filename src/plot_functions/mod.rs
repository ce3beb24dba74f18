// src/plot_functions/mod.rs

pub mod plot_battery_soc;
pub mod plot_flight_route;
pub mod plot_power_energy;

// src/plot_functions/mod.rs
