//! Output file naming shared by the renderers and the import computation.

/// `PoseStamped` → `pose_stamped`, `HTTPServer` → `http_server`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (next_lower && prev != '_');
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// `DriveMode` → `DRIVE_MODE`, the prefix of synthetic enum values.
pub fn to_upper_snake_case(name: &str) -> String {
    to_snake_case(name).to_ascii_uppercase()
}

/// Relative path of the `.msg` file for `message`: `pkg/Message.msg`.
pub fn ros_file_name(package: &[String], message: &str) -> String {
    join_path(package, &format!("{message}.msg"))
}

/// Relative path of the `.proto` file for `message`: `pkg/message.proto`.
pub fn proto_file_name(package: &[String], message: &str) -> String {
    join_path(package, &format!("{}.proto", to_snake_case(message)))
}

fn join_path(package: &[String], leaf: &str) -> String {
    if package.is_empty() {
        leaf.to_string()
    } else {
        format!("{}/{leaf}", package.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_follows_word_boundaries() {
        assert_eq!(to_snake_case("MyInt"), "my_int");
        assert_eq!(to_snake_case("PoseStamped"), "pose_stamped");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("Pose2D"), "pose2_d");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("Odd_Name"), "odd_name");
    }

    #[test]
    fn file_names_include_package_directory() {
        let pkg = vec!["nav_msgs".to_string()];
        assert_eq!(ros_file_name(&pkg, "Odometry"), "nav_msgs/Odometry.msg");
        assert_eq!(proto_file_name(&pkg, "Odometry"), "nav_msgs/odometry.proto");
        assert_eq!(ros_file_name(&[], "Point"), "Point.msg");
    }
}
