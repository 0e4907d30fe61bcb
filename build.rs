fn main() {
    println!("cargo:rerun-if-env-changed=PASSBOX_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=PASSBOX_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=PASSBOX_CONFIG_JSON");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
