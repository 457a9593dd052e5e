use super::*;

#[test]
fn recipe_paths_embed_the_id() {
    let id: Uuid = "9aa64f31-9660-4a2c-9f96-8a82acbcbcd8".parse().unwrap();
    assert_eq!(recipe_path(id), "/recipes/9aa64f31-9660-4a2c-9f96-8a82acbcbcd8");
}
