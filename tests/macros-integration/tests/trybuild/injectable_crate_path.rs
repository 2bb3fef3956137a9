use boot::Component;

#[derive(Default, boot::Injectable)]
#[boot(crate = "boot_di")]
struct Settings {
    #[boot("config,key:RETRIES,default:3")]
    retries: u8,
    #[boot("config,key:VERBOSE")]
    verbose: bool,
}

impl Component for Settings {}

fn main() {
    let registry = boot_di::ComponentRegistry::default();
    let entry = registry.add("default", false, Settings::default()).unwrap();
    assert_eq!(entry.fields()[0].name, "retries");
}
