/*
 * Shell-style variable substitution for container command lines.
 *
 * Supported forms:
 *
 *   $NAME, ${NAME}     value of NAME, empty string if unset
 *   ${NAME:-default}   value of NAME, `default` if unset or empty
 *   $$                 a literal `$`
 *
 * A `$` not followed by any of the above is kept as-is. An unclosed `${`,
 * an empty `${}` or a braced name with invalid characters is an error.
 */

use std::collections::BTreeMap;
use thiserror::Error;

pub type Vars = BTreeMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed variable reference in `{0}`")]
    Unclosed(String),

    #[error("empty variable reference in `{0}`")]
    EmptyName(String),

    #[error("invalid variable name `{name}` in `{input}`")]
    InvalidName {
	name: String,
	input: String,
    },
}

/*
 * What to do with an argument whose substitution fails.
 *
 * Lenient drops the argument and keeps going, preserving the relative order
 * of the arguments that survive. This is what deployment uses. Strict stops
 * at the first failure and reports it.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SubstitutionPolicy {
    #[default]
    Lenient,
    Strict,
}

impl SubstitutionPolicy {
    pub fn apply(&self, args: &[String], vars: &Vars) -> Result<Vec<String>, TemplateError> {
	match self {
	    SubstitutionPolicy::Lenient => Ok(substitute_lenient(args, vars)),
	    SubstitutionPolicy::Strict => args.iter().map(|arg| substitute(arg, vars)).collect(),
	}
    }
}

/*
 * Substitutes every argument independently. Arguments that fail to
 * substitute are silently dropped.
 */
pub fn substitute_lenient(args: &[String], vars: &Vars) -> Vec<String> {
    args.iter()
	.filter_map(|arg| match substitute(arg, vars) {
	    Ok(expanded) => Some(expanded),
	    Err(err) => {
		log::debug!("dropping argument: {}", err);
		None
	    },
	})
	.collect()
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn lookup<'a>(vars: &'a Vars, name: &str) -> &'a str {
    vars.get(name).map(|v| v.as_str()).unwrap_or("")
}

fn expand_braced(body: &str, input: &str, vars: &Vars) -> Result<String, TemplateError> {
    let (name, default) = match body.split_once(":-") {
	Some((name, default)) => (name, Some(default)),
	None => (body, None),
    };

    if name.is_empty() {
	return Err(TemplateError::EmptyName(input.to_string()));
    }

    let mut chars = name.chars();
    let valid = chars.next().map(is_name_start).unwrap_or(false) && chars.all(is_name_char);
    if !valid {
	return Err(TemplateError::InvalidName{
	    name: name.to_string(),
	    input: input.to_string(),
	});
    }

    let value = lookup(vars, name);
    match default {
	Some(default) if value.is_empty() => Ok(default.to_string()),
	_ => Ok(value.to_string()),
    }
}

pub fn substitute(input: &str, vars: &Vars) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
	if c != '$' {
	    out.push(c);
	    continue;
	}

	match chars.peek().copied() {
	    Some('$') => {
		chars.next();
		out.push('$');
	    },
	    Some('{') => {
		chars.next();

		let mut body = String::new();
		let mut closed = false;
		for c in chars.by_ref() {
		    if c == '}' {
			closed = true;
			break;
		    }
		    body.push(c);
		}

		if !closed {
		    return Err(TemplateError::Unclosed(input.to_string()));
		}
		out.push_str(&expand_braced(&body, input, vars)?);
	    },
	    Some(c) if is_name_start(c) => {
		let mut name = String::new();
		while let Some(&c) = chars.peek() {
		    if !is_name_char(c) {
			break;
		    }
		    name.push(c);
		    chars.next();
		}
		out.push_str(lookup(vars, &name));
	    },
	    _ => out.push('$'),
	}
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Vars {
	BTreeMap::from([(String::from("RTE_POLL_INTERVAL"), String::from("10s"))])
    }

    fn args(list: &[&str]) -> Vec<String> {
	list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn braced_and_bare_references() {
	assert_eq!(substitute("--poll-interval=${RTE_POLL_INTERVAL}", &vars()).unwrap(), "--poll-interval=10s");
	assert_eq!(substitute("--poll-interval=$RTE_POLL_INTERVAL", &vars()).unwrap(), "--poll-interval=10s");
	assert_eq!(substitute("$RTE_POLL_INTERVAL/x", &vars()).unwrap(), "10s/x");
    }

    #[test]
    fn unset_variables_become_empty() {
	assert_eq!(substitute("--sysfs=${SYSFS}", &vars()).unwrap(), "--sysfs=");
	assert_eq!(substitute("--sysfs=$SYSFS", &vars()).unwrap(), "--sysfs=");
    }

    #[test]
    fn defaults() {
	assert_eq!(substitute("${SYSFS:-/host-sys}", &vars()).unwrap(), "/host-sys");
	assert_eq!(substitute("${RTE_POLL_INTERVAL:-60s}", &vars()).unwrap(), "10s");
    }

    #[test]
    fn literal_dollars() {
	assert_eq!(substitute("cost=$$5", &vars()).unwrap(), "cost=$5");
	assert_eq!(substitute("a $ b", &vars()).unwrap(), "a $ b");
	assert_eq!(substitute("ends with $", &vars()).unwrap(), "ends with $");
	assert_eq!(substitute("no variables here", &vars()).unwrap(), "no variables here");
    }

    #[test]
    fn malformed_references() {
	assert_eq!(
	    substitute("--bad=${UNCLOSED", &vars()),
	    Err(TemplateError::Unclosed(String::from("--bad=${UNCLOSED")))
	);
	assert_eq!(substitute("${}", &vars()), Err(TemplateError::EmptyName(String::from("${}"))));
	assert!(matches!(substitute("${NOT VALID}", &vars()), Err(TemplateError::InvalidName{ .. })));
	assert!(matches!(substitute("${1ST}", &vars()), Err(TemplateError::InvalidName{ .. })));
    }

    #[test]
    fn lenient_drops_malformed_arguments() {
	let input = args(&["--poll-interval=${RTE_POLL_INTERVAL}", "--bad=${UNCLOSED"]);
	assert_eq!(substitute_lenient(&input, &vars()), args(&["--poll-interval=10s"]));
    }

    #[test]
    fn lenient_keeps_relative_order() {
	let input = args(&["/bin/rte", "--a=${}", "--poll=$RTE_POLL_INTERVAL", "--b=${X", "--v=2"]);
	assert_eq!(substitute_lenient(&input, &vars()), args(&["/bin/rte", "--poll=10s", "--v=2"]));
    }

    #[test]
    fn strict_reports_first_failure() {
	let input = args(&["--ok=$RTE_POLL_INTERVAL", "--bad=${UNCLOSED", "--also-bad=${}"]);
	assert_eq!(
	    SubstitutionPolicy::Strict.apply(&input, &vars()),
	    Err(TemplateError::Unclosed(String::from("--bad=${UNCLOSED")))
	);

	let fine = args(&["--ok=$RTE_POLL_INTERVAL"]);
	assert_eq!(SubstitutionPolicy::Strict.apply(&fine, &vars()), Ok(args(&["--ok=10s"])));
    }

    #[test]
    fn default_policy_is_lenient() {
	let input = args(&["--bad=${UNCLOSED"]);
	assert_eq!(SubstitutionPolicy::default(), SubstitutionPolicy::Lenient);
	assert_eq!(SubstitutionPolicy::default().apply(&input, &vars()), Ok(vec![]));
    }
}
