use crate::atlas::Atlas;
use crate::export::AtlasMeta;
use std::fmt::Write as _;

/// cocos2d-style Apple plist (XML, format 2) with frames in a dict keyed by sprite key.
/// Multi-page atlases list every page file under `textureFileNames`.
pub fn to_plist(atlas: &Atlas, meta: &AtlasMeta, page_names: &[String]) -> String {
    let mut s = String::new();
    s.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>frames</key>
  <dict>
"#,
    );
    for r in atlas.regions() {
        let _ = write!(
            s,
            "    <key>{}</key>\n    <dict>\n      <key>frame</key><string>{{{{{},{}}},{{{},{}}}}}</string>\n      <key>offset</key><string>{{0,0}}</string>\n      <key>rotated</key><false/>\n      <key>sourceColorRect</key><string>{{{{0,0}},{{{},{}}}}}</string>\n      <key>sourceSize</key><string>{{{},{}}}</string>\n      <key>page</key><integer>{}</integer>\n      <key>zOrder</key><integer>{}</integer>\n    </dict>\n",
            xml_escape(&r.key),
            r.x(),
            r.y(),
            r.width(),
            r.height(),
            r.width(),
            r.height(),
            r.width(),
            r.height(),
            r.page,
            r.rect.z_order,
        );
    }
    s.push_str("  </dict>\n  <key>metadata</key>\n  <dict>\n    <key>format</key><integer>2</integer>\n");
    let names: Vec<String> = atlas
        .pages()
        .iter()
        .map(|p| {
            page_names
                .get(p.index())
                .cloned()
                .unwrap_or_else(|| format!("page{}.png", p.index()))
        })
        .collect();
    if let [single] = names.as_slice() {
        let _ = writeln!(
            s,
            "    <key>textureFileName</key><string>{0}</string>\n    <key>realTextureFileName</key><string>{0}</string>",
            xml_escape(single)
        );
        if let Some(p0) = atlas.pages().first() {
            let _ = writeln!(s, "    <key>size</key><string>{{{},{}}}</string>", p0.width(), p0.height());
        }
    } else {
        s.push_str("    <key>textureFileNames</key><array>\n");
        for n in &names {
            let _ = writeln!(s, "      <string>{}</string>", xml_escape(n));
        }
        s.push_str("    </array>\n");
    }
    let _ = write!(
        s,
        "    <key>app</key><string>{}</string>\n    <key>version</key><string>{}</string>\n    <key>scale</key><real>{}</real>\n    <key>powerOfTwo</key><{} />\n    <key>premultipliedAlpha</key><false />\n",
        xml_escape(&meta.app),
        xml_escape(&meta.version),
        meta.scale,
        if meta.power_of_two { "true" } else { "false" },
    );
    s.push_str("  </dict>\n</dict>\n</plist>\n");
    s
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
