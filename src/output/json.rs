use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::render_json;
    use crate::lookup::LookupState;

    #[test]
    fn lookup_state_is_tagged() {
        let rendered = render_json(&LookupState::Found(1.3)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["state"], "found");
        assert_eq!(value["value"], 1.3);
    }
}
