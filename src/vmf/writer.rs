//! Text emission of map documents
//!
//! The output is a tree of named blocks holding quoted key/value pairs,
//! indented with one tab per level:
//!
//! ```text
//! world
//! {
//! 	"id" "1"
//! 	solid
//! 	{
//! 		"id" "2"
//! 		...
//! ```
//!
//! Level editors compare these files textually, so the layout, including the
//! blank lines between top level blocks, is reproduced exactly. Numbers are
//! written in their shortest round-trip form, texture axes of swept faces with
//! 4 decimals.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::path::Path;

use tracing::instrument;

use crate::math::Vec3;

use super::model::{AxisFormat, Document, Editor, Entity, Group, Side, Solid, TextureAxis, WORLD_ID};

const VERSION_INFO: [(&str, &str); 5] = [
    ("editorversion", "400"),
    ("editorbuild", "8400"),
    ("mapversion", "1"),
    ("formatversion", "100"),
    ("prefab", "0"),
];

const VIEW_SETTINGS: [(&str, &str); 5] = [
    ("bSnapToGrid", "1"),
    ("bShowGrid", "1"),
    ("bShowLogicalGrid", "0"),
    ("nGridSpacing", "64"),
    ("bShow3DGrid", "0"),
];

const WORLD_PROPERTIES: [(&str, &str); 6] = [
    ("mapversion", "1"),
    ("classname", "worldspawn"),
    ("skyname", "sky_day01_01"),
    ("maxpropscreenwidth", "-1"),
    ("detailvbsp", "detail.vbsp"),
    ("detailmaterial", "detail/detailsprites"),
];

const CORDON_MINS: &str = "(-10240 -10240 -10240)";
const CORDON_MAXS: &str = "(10240 10240 10240)";

/// Writes a document to a file
pub fn write<P: AsRef<Path>>(path: P, document: &Document) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    document.write_to(&mut writer)?;
    io::Write::flush(&mut writer)
}

impl Document {
    /// Renders the document into `writer`
    #[instrument(skip_all)]
    pub fn write_to<W: io::Write>(&self, writer: W) -> io::Result<()> {
        VmfWriter::new(writer).write_document(self)
    }

    /// Renders the document into a string
    pub fn to_vmf_string(&self) -> String {
        let mut out = Vec::new();
        // writing to a Vec can't fail
        let _ = self.write_to(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

pub struct VmfWriter<W: io::Write> {
    out: W,
    line_buf: Vec<u8>,
    depth: usize,
}

impl<W: io::Write> VmfWriter<W> {
    pub fn new(writer: W) -> Self {
        VmfWriter {
            out: writer,
            line_buf: Vec::with_capacity(256),
            depth: 0,
        }
    }

    #[inline]
    fn push_str(&mut self, s: &str) {
        self.line_buf.extend_from_slice(s.as_bytes());
    }

    #[inline]
    fn push_u<T: itoa::Integer>(&mut self, v: T) {
        let mut buf = itoa::Buffer::new();
        self.push_str(buf.format(v));
    }

    #[inline]
    fn push_f(&mut self, v: f64) {
        push_shortest(&mut self.line_buf, v);
    }

    #[inline]
    fn push_fixed(&mut self, v: f64) {
        push_fixed4(&mut self.line_buf, v);
    }

    fn push_point(&mut self, p: &Vec3) {
        self.push_f(p.x);
        self.push_str(" ");
        self.push_f(p.y);
        self.push_str(" ");
        self.push_f(p.z);
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.line_buf.push(b'\t');
        }
    }

    #[inline]
    fn flush_line(&mut self) -> io::Result<()> {
        self.line_buf.push(b'\n');
        self.out.write_all(&self.line_buf)?;
        self.line_buf.clear();
        Ok(())
    }

    fn blank_line(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    fn begin_block(&mut self, name: &str) -> io::Result<()> {
        self.indent();
        self.push_str(name);
        self.flush_line()?;
        self.indent();
        self.push_str("{");
        self.flush_line()?;
        self.depth += 1;
        Ok(())
    }

    fn end_block(&mut self) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.push_str("}");
        self.flush_line()
    }

    /// Writes `"key" "value"` where the value is produced by `value`
    fn key_with<F: FnOnce(&mut Self)>(&mut self, key: &str, value: F) -> io::Result<()> {
        self.indent();
        self.push_str("\"");
        self.push_str(key);
        self.push_str("\" \"");
        value(self);
        self.push_str("\"");
        self.flush_line()
    }

    fn key(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.key_with(key, |w| w.push_str(value))
    }

    fn key_u<T: itoa::Integer>(&mut self, key: &str, value: T) -> io::Result<()> {
        self.key_with(key, |w| w.push_u(value))
    }

    fn key_flag(&mut self, key: &str, value: bool) -> io::Result<()> {
        self.key_u(key, u8::from(value))
    }

    fn key_axis(&mut self, key: &str, axis: &TextureAxis) -> io::Result<()> {
        self.key_with(key, |w| {
            let component = |w: &mut Self, v: f64| match axis.format {
                AxisFormat::Fixed => w.push_fixed(v),
                AxisFormat::Shortest => w.push_f(v),
            };
            w.push_str("[");
            component(w, axis.direction.x);
            w.push_str(" ");
            component(w, axis.direction.y);
            w.push_str(" ");
            component(w, axis.direction.z);
            w.push_str(" ");
            component(w, axis.shift);
            w.push_str("] ");
            w.push_f(axis.scale);
        })
    }

    fn properties(&mut self, properties: &[(&str, &str)]) -> io::Result<()> {
        for (key, value) in properties {
            self.key(key, value)?;
        }
        Ok(())
    }

    pub fn write_document(&mut self, document: &Document) -> io::Result<()> {
        self.begin_block("versioninfo")?;
        self.properties(&VERSION_INFO)?;
        self.end_block()?;
        self.blank_line()?;

        self.begin_block("visgroups")?;
        self.end_block()?;
        self.blank_line()?;

        self.begin_block("viewsettings")?;
        self.properties(&VIEW_SETTINGS)?;
        self.end_block()?;
        self.blank_line()?;

        self.begin_block("world")?;
        self.key_u("id", WORLD_ID)?;
        self.properties(&WORLD_PROPERTIES)?;
        for solid in &document.world.solids {
            self.write_solid(solid)?;
        }
        for group in &document.world.groups {
            self.write_group(group)?;
        }
        self.end_block()?;
        self.blank_line()?;

        for entity in &document.entities {
            self.write_entity(entity)?;
        }

        self.begin_block("cameras")?;
        self.key("activecamera", "-1")?;
        self.end_block()?;

        self.begin_block("cordons")?;
        self.key("mins", CORDON_MINS)?;
        self.key("maxs", CORDON_MAXS)?;
        self.key("active", "0")?;
        self.end_block()?;
        self.out.flush()
    }

    fn write_solid(&mut self, solid: &Solid) -> io::Result<()> {
        self.begin_block("solid")?;
        self.key_u("id", solid.id)?;
        for side in &solid.sides {
            self.write_side(side)?;
        }
        self.write_editor(&solid.editor)?;
        self.end_block()
    }

    fn write_side(&mut self, side: &Side) -> io::Result<()> {
        self.begin_block("side")?;
        self.key_u("id", side.id)?;
        self.key_with("plane", |w| {
            for (i, point) in side.plane.0.iter().enumerate() {
                if i > 0 {
                    w.push_str(" ");
                }
                w.push_str("(");
                w.push_point(point);
                w.push_str(")");
            }
        })?;
        if !side.vertices.is_empty() {
            self.begin_block("vertices_plus")?;
            for vertex in &side.vertices {
                self.key_with("v", |w| w.push_point(vertex))?;
            }
            self.end_block()?;
        }
        self.key("material", &side.material)?;
        self.key_axis("uaxis", &side.uaxis)?;
        self.key_axis("vaxis", &side.vaxis)?;
        self.key_with("rotation", |w| w.push_u(side.rotation))?;
        self.key_u("lightmapscale", side.lightmap_scale)?;
        self.key_u("smoothing_groups", side.smoothing_groups)?;
        self.end_block()
    }

    fn write_editor(&mut self, editor: &Editor) -> io::Result<()> {
        self.begin_block("editor")?;
        self.key_with("color", |w| w.push_str(&editor.color.to_string()))?;
        self.key_flag("visgroupshown", editor.visgroup_shown)?;
        self.key_flag("visgroupautoshown", editor.visgroup_auto_shown)?;
        if let Some(group_id) = editor.group_id {
            self.key_u("groupid", group_id)?;
        }
        self.end_block()
    }

    fn write_group(&mut self, group: &Group) -> io::Result<()> {
        self.begin_block("group")?;
        self.key_u("id", group.id)?;
        self.write_editor(&group.editor)?;
        self.end_block()
    }

    fn write_entity(&mut self, entity: &Entity) -> io::Result<()> {
        self.begin_block("entity")?;
        self.key_u("id", entity.id)?;
        self.key("classname", &entity.classname)?;
        for solid in &entity.solids {
            self.write_solid(solid)?;
        }
        for (key, value) in &entity.properties {
            self.key(key, value)?;
        }
        self.end_block()
    }
}

/// Shortest representation that reads back to the same value.
///
/// Integral values have no decimal point, exponent notation is only used
/// below 1e-6 and from 1e21 upwards, and negative zero is written as `0`.
fn push_shortest(buf: &mut Vec<u8>, v: f64) {
    if v == 0.0 {
        buf.push(b'0');
        return;
    }
    if !v.is_finite() {
        let s = if v.is_nan() {
            "NaN"
        } else if v > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        buf.extend_from_slice(s.as_bytes());
        return;
    }
    if v.fract() == 0.0 && v.abs() < 1e16 {
        let mut ibuf = itoa::Buffer::new();
        buf.extend_from_slice(ibuf.format(v as i64).as_bytes());
        return;
    }
    let mut rbuf = ryu::Buffer::new();
    let s = rbuf.format_finite(v);
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            if (-6..21).contains(&exponent) {
                expand_exponent(buf, mantissa, exponent);
            } else {
                buf.extend_from_slice(mantissa.as_bytes());
                buf.push(b'e');
                if exponent > 0 {
                    buf.push(b'+');
                }
                let mut ibuf = itoa::Buffer::new();
                buf.extend_from_slice(ibuf.format(exponent).as_bytes());
            }
        }
        None => buf.extend_from_slice(s.as_bytes()),
    }
}

/// Writes `mantissa * 10^exponent` without exponent, the mantissa has a
/// single integer digit
fn expand_exponent(buf: &mut Vec<u8>, mantissa: &str, exponent: i32) {
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => (true, m),
        None => (false, mantissa),
    };
    let digits: Vec<u8> = mantissa.bytes().filter(|b| *b != b'.').collect();
    if negative {
        buf.push(b'-');
    }
    let point = exponent + 1;
    if point <= 0 {
        buf.extend_from_slice(b"0.");
        buf.extend(std::iter::repeat_n(b'0', (-point) as usize));
        buf.extend_from_slice(&digits);
    } else {
        let point = point as usize;
        if point >= digits.len() {
            buf.extend_from_slice(&digits);
            buf.extend(std::iter::repeat_n(b'0', point - digits.len()));
        } else {
            buf.extend_from_slice(&digits[..point]);
            buf.push(b'.');
            buf.extend_from_slice(&digits[point..]);
        }
    }
}

/// Four decimals rounded from the exact binary value, exact ties round away
/// from zero.
///
/// A value sits exactly halfway between two four decimal neighbours only when
/// it is an odd multiple of 1/32; every other value is left to `{:.4}`, which
/// already rounds the exact value.
fn push_fixed4(buf: &mut Vec<u8>, v: f64) {
    let v = if v == 0.0 { 0.0 } else { v };
    let s = if is_exact_tie(v.abs()) {
        let rounded = ((v.abs() * 10_000.0).floor() + 1.0) / 10_000.0;
        let sign = if v < 0.0 { "-" } else { "" };
        format!("{sign}{rounded:.4}")
    } else {
        format!("{v:.4}")
    };
    buf.extend_from_slice(s.as_bytes());
}

fn is_exact_tie(abs: f64) -> bool {
    // scaling by a power of two is exact
    let thirty_seconds = abs * 32.0;
    thirty_seconds.fract() == 0.0 && thirty_seconds % 2.0 == 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vmf::{Color, Plane, SideSpec, VmfBuilder};
    use pretty_assertions::assert_eq;
    #[cfg(not(target_family = "wasm"))]
    use std::path::PathBuf;
    #[cfg(not(target_family = "wasm"))]
    use testdir::testdir;

    fn shortest(v: f64) -> String {
        let mut buf = Vec::new();
        push_shortest(&mut buf, v);
        String::from_utf8(buf).unwrap()
    }

    fn fixed(v: f64) -> String {
        let mut buf = Vec::new();
        push_fixed4(&mut buf, v);
        String::from_utf8(buf).unwrap()
    }

    const EMPTY_HEADER: &str = concat!(
        "versioninfo\n{\n",
        "\t\"editorversion\" \"400\"\n",
        "\t\"editorbuild\" \"8400\"\n",
        "\t\"mapversion\" \"1\"\n",
        "\t\"formatversion\" \"100\"\n",
        "\t\"prefab\" \"0\"\n",
        "}\n\n",
        "visgroups\n{\n}\n\n",
        "viewsettings\n{\n",
        "\t\"bSnapToGrid\" \"1\"\n",
        "\t\"bShowGrid\" \"1\"\n",
        "\t\"bShowLogicalGrid\" \"0\"\n",
        "\t\"nGridSpacing\" \"64\"\n",
        "\t\"bShow3DGrid\" \"0\"\n",
        "}\n\n",
        "world\n{\n",
        "\t\"id\" \"1\"\n",
        "\t\"mapversion\" \"1\"\n",
        "\t\"classname\" \"worldspawn\"\n",
        "\t\"skyname\" \"sky_day01_01\"\n",
        "\t\"maxpropscreenwidth\" \"-1\"\n",
        "\t\"detailvbsp\" \"detail.vbsp\"\n",
        "\t\"detailmaterial\" \"detail/detailsprites\"\n",
    );

    const FOOTER: &str = concat!(
        "cameras\n{\n",
        "\t\"activecamera\" \"-1\"\n",
        "}\n",
        "cordons\n{\n",
        "\t\"mins\" \"(-10240 -10240 -10240)\"\n",
        "\t\"maxs\" \"(10240 10240 10240)\"\n",
        "\t\"active\" \"0\"\n",
        "}\n",
    );

    #[test]
    fn test_empty_document() {
        let document = Document::default();
        let expected = format!("{EMPTY_HEADER}}}\n\n{FOOTER}");
        assert_eq!(document.to_vmf_string(), expected);
    }

    #[test]
    fn test_solid_group_and_entity() {
        let mut builder = VmfBuilder::new();
        let side = SideSpec {
            plane: Plane::new(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(-1.5, 2.0, 0.0),
                Vec3::new(1.0, 0.0, 320.0),
            ),
            vertices: vec![Vec3::new(1.0, -2.0, 0.5)],
            material: "tools/toolsplayerclip".to_string(),
            uaxis: TextureAxis::fixed(Vec3::new(0.0, -1.0, 0.0), 12.5, 0.25),
            vaxis: TextureAxis::shortest(Vec3::new(0.0, 0.0, -1.0), 0.0, 0.25),
        };
        let group = builder.add_group();
        let clip = builder.solid(vec![side.clone()], Editor::grouped(Color::CLIP, group));
        builder.add_world_solid(clip);
        let visual = builder.solid(
            vec![SideSpec {
                vertices: vec![],
                ..side
            }],
            Editor::new(Color::VISUAL),
        );
        builder.add_entity(
            "func_brush",
            vec![visual],
            vec![("solidity".to_string(), "1".to_string())],
        );
        let document = builder.finish();

        let expected = format!(
            "{EMPTY_HEADER}{}{FOOTER}",
            concat!(
                "\tsolid\n\t{\n",
                "\t\t\"id\" \"3\"\n",
                "\t\tside\n\t\t{\n",
                "\t\t\t\"id\" \"4\"\n",
                "\t\t\t\"plane\" \"(0 0 0) (-1.5 2 0) (1 0 320)\"\n",
                "\t\t\tvertices_plus\n\t\t\t{\n",
                "\t\t\t\t\"v\" \"1 -2 0.5\"\n",
                "\t\t\t}\n",
                "\t\t\t\"material\" \"tools/toolsplayerclip\"\n",
                "\t\t\t\"uaxis\" \"[0.0000 -1.0000 0.0000 12.5000] 0.25\"\n",
                "\t\t\t\"vaxis\" \"[0 0 -1 0] 0.25\"\n",
                "\t\t\t\"rotation\" \"0\"\n",
                "\t\t\t\"lightmapscale\" \"16\"\n",
                "\t\t\t\"smoothing_groups\" \"0\"\n",
                "\t\t}\n",
                "\t\teditor\n\t\t{\n",
                "\t\t\t\"color\" \"220 30 220\"\n",
                "\t\t\t\"visgroupshown\" \"1\"\n",
                "\t\t\t\"visgroupautoshown\" \"1\"\n",
                "\t\t\t\"groupid\" \"2\"\n",
                "\t\t}\n",
                "\t}\n",
                "\tgroup\n\t{\n",
                "\t\t\"id\" \"2\"\n",
                "\t\teditor\n\t\t{\n",
                "\t\t\t\"color\" \"192 192 0\"\n",
                "\t\t\t\"visgroupshown\" \"1\"\n",
                "\t\t\t\"visgroupautoshown\" \"1\"\n",
                "\t\t}\n",
                "\t}\n",
                "}\n\n",
                "entity\n{\n",
                "\t\"id\" \"7\"\n",
                "\t\"classname\" \"func_brush\"\n",
                "\tsolid\n\t{\n",
                "\t\t\"id\" \"5\"\n",
                "\t\tside\n\t\t{\n",
                "\t\t\t\"id\" \"6\"\n",
                "\t\t\t\"plane\" \"(0 0 0) (-1.5 2 0) (1 0 320)\"\n",
                "\t\t\t\"material\" \"tools/toolsplayerclip\"\n",
                "\t\t\t\"uaxis\" \"[0.0000 -1.0000 0.0000 12.5000] 0.25\"\n",
                "\t\t\t\"vaxis\" \"[0 0 -1 0] 0.25\"\n",
                "\t\t\t\"rotation\" \"0\"\n",
                "\t\t\t\"lightmapscale\" \"16\"\n",
                "\t\t\t\"smoothing_groups\" \"0\"\n",
                "\t\t}\n",
                "\t\teditor\n\t\t{\n",
                "\t\t\t\"color\" \"220 220 220\"\n",
                "\t\t\t\"visgroupshown\" \"1\"\n",
                "\t\t\t\"visgroupautoshown\" \"1\"\n",
                "\t\t}\n",
                "\t}\n",
                "\t\"solidity\" \"1\"\n",
                "}\n",
            )
        );
        assert_eq!(document.to_vmf_string(), expected);
    }

    #[test]
    fn test_shortest_numbers() {
        assert_eq!(shortest(0.0), "0");
        assert_eq!(shortest(-0.0), "0");
        assert_eq!(shortest(1024.0), "1024");
        assert_eq!(shortest(-256.0), "-256");
        assert_eq!(shortest(0.25), "0.25");
        assert_eq!(shortest(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(shortest(6.123233995736766e-14), "6.123233995736766e-14");
        assert_eq!(shortest(1.5e-6), "0.0000015");
        assert_eq!(shortest(-2.5e-5), "-0.000025");
        assert_eq!(shortest(1.5e17), "150000000000000000");
        assert_eq!(shortest(1e-7), "1e-7");
        assert_eq!(shortest(1e21), "1e+21");
        assert_eq!(shortest(f64::NAN), "NaN");
    }

    #[test]
    fn test_fixed_numbers() {
        assert_eq!(fixed(0.0), "0.0000");
        assert_eq!(fixed(-0.0), "0.0000");
        assert_eq!(fixed(1.0), "1.0000");
        assert_eq!(fixed(-0.70710678), "-0.7071");
        assert_eq!(fixed(1023.99999), "1024.0000");
        assert_eq!(fixed(-0.00001), "-0.0000");
        // exact binary ties round away from zero
        assert_eq!(fixed(0.03125), "0.0313");
        assert_eq!(fixed(-0.03125), "-0.0313");
        assert_eq!(fixed(0.96875), "0.9688");
        assert_eq!(fixed(2.15625), "2.1563");
    }

    #[test]
    fn test_fixed_numbers_decimal_halves_follow_binary_value() {
        // 0.00035 is stored as 0.000349999...
        assert_eq!(fixed(0.00035), "0.0003");
        assert_eq!(fixed(-0.00035), "-0.0003");
        // 2.00025 is stored as 2.000249999...
        assert_eq!(fixed(2.00025), "2.0002");
        // 0.00015 is stored as 0.000149999...
        assert_eq!(fixed(0.00015), "0.0001");
    }

    #[test]
    #[cfg(not(target_family = "wasm"))]
    fn test_write_file() -> io::Result<()> {
        let dir: PathBuf = testdir!();
        let path = dir.join("empty.vmf");
        write(&path, &Document::default())?;
        let written = std::fs::read_to_string(&path)?;
        assert_eq!(written, Document::default().to_vmf_string());
        Ok(())
    }
}
