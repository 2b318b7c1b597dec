fn main() {
    println!("cargo:rerun-if-changed=config/device.json");

    // Host builds (tests, simulation) have no ESP-IDF environment to export.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
