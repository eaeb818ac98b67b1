//! HCL rendering for [`JobDefinition`].
//!
//! Output is the job specification text accepted by the scheduler's
//! `/v1/jobs/parse` endpoint. Every string value goes through
//! [`escape_string`], so identifiers and image references can never break out
//! of their literal or start an interpolation.

use std::time::Duration;

use crate::JobDefinition;

/// Render a job definition as HCL text.
pub fn render_hcl(def: &JobDefinition) -> String {
    let mut w = HclWriter::default();

    w.open("job", Some(def.id.as_str()));
    w.attr("region", &quote(&def.region));
    w.attr("datacenters", &list(&def.datacenters));
    w.attr("type", &quote(&def.job_type));
    w.blank();

    w.open("update", None);
    w.attr("stagger", &quote(&duration(def.update.stagger)));
    w.attr("max_parallel", &def.update.max_parallel.to_string());
    w.close();
    w.blank();

    let group = &def.group;
    w.open("group", Some(&group.name));
    w.attr("count", &group.count.to_string());
    w.blank();

    w.open("network", None);
    w.open("port", Some(&group.network.port_label));
    w.attr("static", &group.network.static_port.to_string());
    w.attr("to", &group.network.to.to_string());
    w.attr("host_network", &quote(&group.network.host_network));
    w.close();
    w.close();
    w.blank();

    let check = &group.service.check;
    w.open("service", None);
    w.open("check", None);
    w.attr("name", &quote(&check.name));
    w.attr("port", &quote(&check.port_label));
    w.attr("type", &quote(&check.kind));
    w.attr("path", &quote(&check.path));
    w.attr("interval", &quote(&duration(check.interval)));
    w.attr("timeout", &quote(&duration(check.timeout)));
    w.close();
    w.close();
    w.blank();

    let task = &group.task;
    w.open("task", Some(&task.name));
    w.attr("driver", &quote(&task.driver));
    w.blank();

    w.open("config", None);
    w.attr("image", &quote(&task.config.image));
    w.attr("force_pull", &task.config.force_pull.to_string());
    w.attr("ports", &list(&task.config.ports));
    w.open_map("labels");
    for (key, value) in &task.config.labels {
        w.attr(&quote(key), &quote(value));
    }
    w.close();
    w.close();
    w.blank();

    w.open("resources", None);
    w.attr("cpu", &task.resources.cpu_mhz.to_string());
    w.attr("memory", &task.resources.memory_mb.to_string());
    w.close();

    w.close(); // task
    w.close(); // group
    w.close(); // job

    w.finish()
}

/// Indentation-aware line writer.
#[derive(Default)]
struct HclWriter {
    out: String,
    depth: usize,
}

impl HclWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, kind: &str, label: Option<&str>) {
        match label {
            Some(label) => self.line(&format!("{kind} {} {{", quote(label))),
            None => self.line(&format!("{kind} {{")),
        }
        self.depth += 1;
    }

    fn open_map(&mut self, key: &str) {
        self.line(&format!("{key} = {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn attr(&mut self, key: &str, value: &str) {
        self.line(&format!("{key} = {value}"));
    }

    fn finish(self) -> String {
        self.out
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

fn list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("[{}]", inner.join(", "))
}

fn duration(d: Duration) -> String {
    format!("{}s", d.as_secs())
}

/// Escape a value for use inside an HCL quoted string.
///
/// Template sequences `${` and `%{` are doubled so they render literally.
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
