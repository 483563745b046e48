use crate::output::print_json;

const PROJECT_URL: &str = "https://github.com/ryansb/ofCourse";

pub fn run(json: bool) -> anyhow::Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        return print_json(&serde_json::json!({
            "version": version,
            "url": PROJECT_URL,
        }));
    }
    println!("You are using ofcourse version {version}");
    println!("Get more information at {PROJECT_URL}");
    Ok(())
}
