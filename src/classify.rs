/// File category used to select the review prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// XCTest/XCUITest suites, mocks and stubs
    Test,
    /// Declarative SwiftUI views and state
    SwiftUi,
    /// Imperative UIKit view controllers and views
    UiKit,
    /// Plain Swift source and anything unrecognized
    Swift,
    /// Project manifests, plists and build configuration
    Config,
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileCategory::Test => write!(f, "Test"),
            FileCategory::SwiftUi => write!(f, "SwiftUI"),
            FileCategory::UiKit => write!(f, "UIKit"),
            FileCategory::Swift => write!(f, "Swift"),
            FileCategory::Config => write!(f, "Config"),
        }
    }
}

const SWIFTUI_INDICATORS: &[&str] = &[
    "import SwiftUI",
    "SwiftUI.",
    "@State",
    "@Binding",
    "@ObservableObject",
    "@Observable",
    "@StateObject",
    "@EnvironmentObject",
    "NavigationView",
    "NavigationStack",
    "NavigationSplitView",
    "VStack",
    "HStack",
    "ZStack",
    "LazyVStack",
    "LazyHStack",
    "ScrollView",
    "some View",
    "ViewModifier",
];

const UIKIT_INDICATORS: &[&str] = &[
    "import UIKit",
    "UIView",
    "UIViewController",
    "UITableView",
    "UICollectionView",
    "UIButton",
    "UILabel",
    "UIImageView",
    "viewDidLoad",
    "viewWillAppear",
    "IBOutlet",
    "IBAction",
    "UINavigationController",
    "UITabBarController",
    "UIStoryboard",
];

const TEST_CONTENT_MARKERS: &[&str] = &[
    "XCTest",
    "@testable",
    "XCTAssert",
    "XCTestCase",
    "XCUIApplication",
    "XCUIElement",
];

const CONFIG_PATTERNS: &[&str] = &[
    ".plist",
    ".xcconfig",
    ".json",
    ".yaml",
    ".yml",
    "Package.swift",
    "Podfile",
    "Cartfile",
    ".entitlements",
];

/// Filenames that mark an iOS project-structure file, used to enrich prompts.
const IOS_PROJECT_INDICATORS: &[&str] = &[
    "Package.swift",
    "project.pbxproj",
    "Info.plist",
    "AppDelegate.swift",
    "SceneDelegate.swift",
    "ContentView.swift",
    "LaunchScreen.storyboard",
    ".entitlements",
    "Podfile",
    "Cartfile",
    "fastlane",
    ".xcconfig",
    "GoogleService-Info.plist",
    "Localizable.strings",
];

/// Assign a review category to a file. Total and deterministic: every
/// (filename, content) pair maps to exactly one category and the `Swift`
/// fallback is always reachable.
///
/// Precedence mirrors the review templates' specificity: tests first, then
/// SwiftUI vs UIKit for `.swift` sources, then configuration files.
pub fn classify(filename: &str, content: &str) -> FileCategory {
    if is_test_file(filename, content) {
        return FileCategory::Test;
    }

    if filename.ends_with(".swift") {
        if SWIFTUI_INDICATORS.iter().any(|m| content.contains(m)) {
            return FileCategory::SwiftUi;
        }
        if UIKIT_INDICATORS.iter().any(|m| content.contains(m)) {
            return FileCategory::UiKit;
        }
        // App entry points without framework markers: @main implies SwiftUI
        // lifecycle, otherwise assume the UIKit delegate world.
        let basename = filename.rsplit('/').next().unwrap_or(filename);
        if matches!(basename, "AppDelegate.swift" | "SceneDelegate.swift" | "App.swift") {
            return if content.contains("@main") {
                FileCategory::SwiftUi
            } else {
                FileCategory::UiKit
            };
        }
        return FileCategory::Swift;
    }

    if CONFIG_PATTERNS
        .iter()
        .any(|p| filename.ends_with(p) || filename.contains(p))
    {
        return FileCategory::Config;
    }

    FileCategory::Swift
}

fn is_test_file(filename: &str, content: &str) -> bool {
    filename.ends_with("Test.swift")
        || filename.ends_with("Tests.swift")
        || filename.contains("/Tests/")
        || filename.contains("Test")
        || filename.contains("Mock")
        || filename.contains("Stub")
        || TEST_CONTENT_MARKERS.iter().any(|m| content.contains(m))
}

/// Simple structural signals over a file's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplexityIndicators {
    pub nested_closures: bool,
    pub long_functions: bool,
    pub many_parameters: bool,
}

/// Feature-usage signals extracted from a file, injected into prompts as
/// advisory metadata. Nothing branches on these beyond textual inclusion.
#[derive(Debug, Clone, Default)]
pub struct ContextInfo {
    pub is_ios_project: bool,
    pub uses_async_await: bool,
    pub uses_combine: bool,
    pub uses_core_data: bool,
    pub uses_swift_data: bool,
    pub uses_networking: bool,
    pub has_ui_tests: bool,
    pub has_unit_tests: bool,
    pub uses_accessibility: bool,
    pub uses_localization: bool,
    pub file_size_lines: usize,
    pub complexity: ComplexityIndicators,
}

/// Extract context signals from a file. Pure and total: empty or non-Swift
/// content simply leaves every flag false.
pub fn extract_context(filename: &str, content: &str) -> ContextInfo {
    ContextInfo {
        is_ios_project: IOS_PROJECT_INDICATORS.iter().any(|m| filename.contains(m)),
        uses_async_await: content.contains("async ") || content.contains("await "),
        uses_combine: content.contains("import Combine") || content.contains("Publisher"),
        uses_core_data: content.contains("import CoreData") || content.contains("NSManagedObject"),
        uses_swift_data: content.contains("import SwiftData") || content.contains("@Model"),
        uses_networking: ["URLSession", "Alamofire", "NetworkReachability"]
            .iter()
            .any(|m| content.contains(m)),
        has_ui_tests: content.contains("XCUIApplication") || content.contains("XCUIElement"),
        has_unit_tests: content.contains("XCTestCase") || content.contains("@testable"),
        uses_accessibility: ["accessibilityLabel", "accessibilityHint", "VoiceOver"]
            .iter()
            .any(|m| content.contains(m)),
        uses_localization: content.contains("NSLocalizedString")
            || content.contains("String(localized:"),
        file_size_lines: content.lines().count(),
        complexity: ComplexityIndicators {
            nested_closures: content.matches("{ ").count() > 3,
            long_functions: content
                .lines()
                .any(|l| l.trim_start().starts_with("func ") && l.len() > 80),
            many_parameters: content.replace(") (", ")(").contains(")("),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_swiftui_view() {
        let content = "import SwiftUI\n\nstruct ProfileView: View {\n    @State private var name = \"\"\n}";
        assert_eq!(classify("Sources/ProfileView.swift", content), FileCategory::SwiftUi);
    }

    #[test]
    fn test_classify_uikit_controller() {
        let content = "import UIKit\n\nclass ProfileViewController: UIViewController {\n    override func viewDidLoad() {}\n}";
        assert_eq!(classify("Sources/ProfileVC.swift", content), FileCategory::UiKit);
    }

    #[test]
    fn test_uiview_substring_does_not_mean_swiftui() {
        // UIKit type names embed "View"; only whole SwiftUI markers such as
        // `some View` may classify a file as SwiftUI.
        let content = "import Foundation\nclass Cell: UITableViewCell {\n    let banner = UIView()\n}";
        assert_eq!(classify("Sources/Cell.swift", content), FileCategory::UiKit);

        let body = "struct Badge {\n    var body: some View { EmptyView() }\n}";
        assert_eq!(classify("Sources/Badge.swift", body), FileCategory::SwiftUi);
    }

    #[test]
    fn test_classify_test_by_filename() {
        assert_eq!(classify("Tests/ProfileViewTest.swift", ""), FileCategory::Test);
        assert_eq!(classify("Sources/NetworkMock.swift", ""), FileCategory::Test);
        assert_eq!(classify("MyApp/Tests/Helpers.swift", ""), FileCategory::Test);
    }

    #[test]
    fn test_classify_test_by_content() {
        let content = "import XCTest\n\nfinal class LoginFlow: XCTestCase {}";
        assert_eq!(classify("Sources/LoginFlow.swift", content), FileCategory::Test);
    }

    #[test]
    fn test_test_wins_over_swiftui() {
        let content = "import SwiftUI\nimport XCTest\nstruct V: View {}";
        assert_eq!(classify("Snapshot.swift", content), FileCategory::Test);
    }

    #[test]
    fn test_classify_app_entry_points() {
        assert_eq!(
            classify("MyApp/App.swift", "@main\nstruct MyApp {}"),
            FileCategory::SwiftUi
        );
        assert_eq!(
            classify("MyApp/AppDelegate.swift", "class AppDelegate {}"),
            FileCategory::UiKit
        );
    }

    #[test]
    fn test_classify_config_files() {
        assert_eq!(classify("MyApp/Info.plist", ""), FileCategory::Config);
        assert_eq!(classify("Podfile", ""), FileCategory::Config);
        assert_eq!(classify("Config/Release.xcconfig", ""), FileCategory::Config);
        // The .swift extension wins over the config-name set.
        assert_eq!(classify("Package.swift", "// swift-tools-version:5.9"), FileCategory::Swift);
    }

    #[test]
    fn test_classify_fallback_is_swift() {
        assert_eq!(classify("Sources/Parser.swift", "struct Parser {}"), FileCategory::Swift);
        assert_eq!(classify("scripts/build.sh", "#!/bin/sh"), FileCategory::Swift);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let content = "import SwiftUI\nstruct V: View {}";
        let first = classify("V.swift", content);
        for _ in 0..5 {
            assert_eq!(classify("V.swift", content), first);
        }
    }

    #[test]
    fn test_extract_context_flags() {
        let content = "import SwiftData\nfunc load() async {\n    await fetch()\n}\nlet session = URLSession.shared\nText(\"hi\").accessibilityLabel(\"greeting\")";
        let ctx = extract_context("MyApp/ContentView.swift", content);
        assert!(ctx.is_ios_project);
        assert!(ctx.uses_async_await);
        assert!(ctx.uses_swift_data);
        assert!(ctx.uses_networking);
        assert!(ctx.uses_accessibility);
        assert!(!ctx.uses_core_data);
        assert_eq!(ctx.file_size_lines, 6);
    }

    #[test]
    fn test_extract_context_empty_content() {
        let ctx = extract_context("whatever.bin", "");
        assert!(!ctx.uses_async_await);
        assert!(!ctx.uses_networking);
        assert_eq!(ctx.file_size_lines, 0);
        assert_eq!(ctx.complexity, ComplexityIndicators::default());
    }
}
