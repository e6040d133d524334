//! All prompt template text: per-category system messages for inline review,
//! the architectural summary prompt, and the posted-comment wrappers and
//! fallback bodies.

use crate::classify::{ContextInfo, FileCategory};
use crate::github::ChangedFile;

const BASE_INSTRUCTIONS: &str = "\
You are a senior iOS developer expert with 10+ years of Swift, SwiftUI, and iOS development experience.
Follow Apple's Human Interface Guidelines and Swift best practices. Focus on code quality, performance, security, and maintainability.

## CORE SWIFT/iOS PRINCIPLES:
- Use Swift's latest features (Swift 5.9+, iOS 17+) and protocol-oriented programming
- Prefer value types (structs) over classes when appropriate
- Follow SOLID principles and clean architecture patterns
- Use the strong type system with proper optionals and Result types
- Prioritize async/await over completion handlers
- Always handle errors gracefully with structured error types
- Follow Apple's naming conventions: camelCase for properties/methods, PascalCase for types

## PERFORMANCE & MEMORY:
- Watch for memory leaks and retain cycles; use weak references where needed
- Implement lazy loading for large datasets and images
- Optimize network requests with proper caching strategies
- Use @MainActor for UI-updating code paths
- Handle background task processing efficiently

## SECURITY & PRIVACY:
- Encrypt sensitive data and use Keychain for secure storage
- Follow App Transport Security guidelines
- Validate all inputs and sanitize user data
- Comply with privacy regulations and App Store guidelines
- Never log sensitive information

## ACCESSIBILITY & INCLUSIVITY:
- Support VoiceOver with proper accessibility labels and hints
- Implement Dynamic Type for text scaling
- Support dark mode and high contrast modes
- Ensure minimum touch target sizes (44pt)
- Handle all screen sizes and orientations (including iPad)

## TESTING & QUALITY ASSURANCE:
- Write comprehensive unit tests with XCTest
- Implement UI tests for critical user flows with XCUITest
- Test edge cases, error scenarios, and performance
- Use SwiftUI previews for rapid UI iteration

## ARCHITECTURE & PATTERNS:
- Use MVVM architecture with SwiftUI
- Implement proper dependency injection
- Follow the single responsibility principle
- Separate business logic from UI logic
- Use the Repository pattern for data access";

const SWIFTUI_GUIDELINES: &str = "

## SWIFTUI SPECIFIC GUIDELINES:
### State Management:
- Use @Observable for reference types (avoid @ObservableObject/@StateObject in new code)
- Use @State only for view-local state
- Use @Binding for two-way data flow between parent/child views
- Use @Environment for app-wide state and dependency injection
- Pass dependencies via initializers, not as global singletons

### UI Architecture:
- Prefer SwiftUI over UIKit for new development
- Use NavigationStack with type-safe navigation for iOS 16+
- Use NavigationSplitView for multi-column layouts on larger screens
- Extract complex views into smaller, focused components
- Create reusable custom ViewModifiers for shared styling

### Layout & Performance:
- Use LazyVStack/LazyHStack for performance with large lists
- Use Grid and ViewThatFits for flexible, adaptive layouts
- Minimize view body computations with @ViewBuilder
- Avoid frequent @State updates that trigger re-renders
- Use id() to control view identity and animations

### Modern SwiftUI Features:
- Use Swift Data with @Query for data persistence (iOS 17+)
- Use .animation(value:) for state-driven animations
- Use SF Symbols with .symbolEffect() and variable colors
- Ensure animations respect reduced motion settings";

const UIKIT_GUIDELINES: &str = "

## UIKIT SPECIFIC GUIDELINES:
### View Controller Best Practices:
- Follow the view controller lifecycle properly (viewDidLoad, viewWillAppear, etc.)
- Implement proper memory management with weak references
- Use the delegation pattern appropriately with weak references
- Avoid massive view controllers; extract logic into separate classes

### Auto Layout & Interface:
- Create adaptive layouts that work on all device sizes
- Implement proper safe area handling
- Use stack views for simple layouts
- Handle keyboard appearance and dismissal properly

### Modern UIKit Features:
- Use UICollectionView compositional layouts and diffable data sources
- Use UIAction for button configurations
- Implement proper UIScene lifecycle management

### SwiftUI Integration:
- Use UIHostingController to embed SwiftUI in UIKit
- Use UIViewRepresentable to wrap UIKit components in SwiftUI
- Maintain consistent navigation patterns across frameworks";

const TEST_GUIDELINES: &str = "

## TESTING SPECIFIC GUIDELINES:
### Unit Testing:
- Write focused, fast, and isolated unit tests
- Use descriptive test method names (test_givenCondition_whenAction_thenExpectation)
- Mock external dependencies and network calls
- Test edge cases, error conditions, and boundary values
- Use the XCTAssert family of assertions appropriately

### UI Testing:
- Test critical user flows and navigation paths
- Use accessibility identifiers for reliable element selection
- Test accessibility features (VoiceOver, Dynamic Type)
- Test error states and recovery scenarios

### Test Architecture:
- Use dependency injection for testable code
- Create test doubles (mocks, stubs, fakes) appropriately
- Maintain test data isolation between test runs";

const CONFIG_GUIDELINES: &str = "

## CONFIGURATION & PROJECT GUIDELINES:
### Project Structure:
- Organize files logically (Features/, Core/, Resources/, Tests/)
- Configure build settings appropriately for Debug/Release
- Use xcconfig files for build configuration management

### Dependencies & Package Management:
- Use Swift Package Manager for dependency management
- Pin dependency versions for reproducible builds
- Regularly audit and update dependencies for security
- Minimize external dependencies where possible

### Security Configuration:
- Configure App Transport Security appropriately
- Set up proper keychain access groups
- Configure background execution and URL scheme handling properly";

const GENERAL_SWIFT_GUIDELINES: &str = "

## GENERAL SWIFT GUIDELINES:
### Language Features:
- Use optionals properly with nil-coalescing and optional chaining
- Prefer immutable (let) over mutable (var) declarations
- Use generics and associated types for type safety
- Leverage protocol extensions for default implementations

### Concurrency:
- Use async/await for asynchronous operations
- Use TaskGroup for concurrent operations
- Handle cancellation properly with Task.isCancelled
- Use actors for thread-safe shared state
- Avoid blocking the main thread with heavy computations

### Data & Networking:
- Use Codable for JSON serialization/deserialization
- Use URLSession with async/await for network requests
- Implement proper error handling for network failures
- Use Core Data or Swift Data for complex data models";

/// Category-specific system message for the inline review call.
pub fn system_message(category: FileCategory) -> String {
    let extra = match category {
        FileCategory::SwiftUi => SWIFTUI_GUIDELINES,
        FileCategory::UiKit => UIKIT_GUIDELINES,
        FileCategory::Test => TEST_GUIDELINES,
        FileCategory::Config => CONFIG_GUIDELINES,
        FileCategory::Swift => GENERAL_SWIFT_GUIDELINES,
    };
    format!("{BASE_INSTRUCTIONS}{extra}")
}

/// User message for the inline review call. Includes the extracted context
/// signals and the explicit list of commentable line numbers so the model
/// cannot target a line that is not in the diff.
pub fn inline_user_message(
    filename: &str,
    category: FileCategory,
    context: &ContextInfo,
    valid_lines: &[u64],
    diff_context: &str,
    max_comments: usize,
) -> String {
    let valid = valid_lines
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Review the changes in Swift/iOS file "{filename}" (Category: {category}).

FILE CONTEXT:
- Category: {category}
- File size: {lines} lines
- iOS project file: {ios}
- Uses async/await: {async_await}
- Uses SwiftData: {swift_data}
- Uses Core Data: {core_data}
- Uses Combine: {combine}
- Has networking: {networking}
- Has UI tests: {ui_tests}
- Has unit tests: {unit_tests}
- Has accessibility features: {accessibility}
- Has localization: {localization}
- Complexity indicators: nested closures: {nested}, long functions: {long_fns}, many parameters: {many_params}

REVIEW FOCUS AREAS:
1. **Code Quality**: Swift best practices, naming conventions, type safety
2. **Architecture**: MVVM patterns, dependency injection, separation of concerns
3. **Performance**: Memory management, lazy loading, async operations
4. **Security**: Data validation, secure storage, privacy compliance
5. **Accessibility**: VoiceOver support, Dynamic Type, inclusive design
6. **Modern Swift**: Latest language features, async/await, @Observable
7. **iOS Guidelines**: Human Interface Guidelines, App Store compliance

Return a JSON array with objects containing "line" (number) and "comment" (string) fields.
Focus on the most critical issues. Maximum {max_comments} comments.
Be specific and actionable in your suggestions.

Valid line numbers for comments: [{valid}]

FILE CHANGES:
```
{diff_context}
```

Prioritize issues by severity: Security > Performance > Bugs > Best Practices > Style"#,
        lines = context.file_size_lines,
        ios = context.is_ios_project,
        async_await = context.uses_async_await,
        swift_data = context.uses_swift_data,
        core_data = context.uses_core_data,
        combine = context.uses_combine,
        networking = context.uses_networking,
        ui_tests = context.has_ui_tests,
        unit_tests = context.has_unit_tests,
        accessibility = context.uses_accessibility,
        localization = context.uses_localization,
        nested = context.complexity.nested_closures,
        long_fns = context.complexity.long_functions,
        many_params = context.complexity.many_parameters,
    )
}

/// System message for the architectural summary call.
pub const SUMMARY_SYSTEM: &str = "You are an expert Swift/SwiftUI architect and code reviewer with 10+ years of iOS development experience.";

/// `- path (+a/-d lines)` listing used in the summary prompt and fallbacks.
pub fn file_list(files: &[ChangedFile]) -> String {
    files
        .iter()
        .map(|f| format!("- {} (+{}/-{} lines)", f.filename, f.additions, f.deletions))
        .collect::<Vec<_>>()
        .join("\n")
}

/// User prompt for the architectural summary: the changed-file listing plus
/// the structured section skeleton the model should fill in.
pub fn summary_prompt(files: &[ChangedFile]) -> String {
    format!(
        r#"You are an expert iOS developer and architect reviewing a pull request for a Swift/iOS application.

**Files Changed ({count} files):**
{list}

Please provide a **comprehensive, structured analysis** covering:

## 📋 Pull Request Summary
- Brief overview of the changes and their purpose
- Impact assessment (High/Medium/Low) on app functionality and user experience

## 🏗️ Architecture & Design Patterns
- SwiftUI vs UIKit usage and integration patterns
- MVVM architecture implementation and data flow
- Dependency injection and separation of concerns
- Clean Architecture and SOLID principles compliance

## 🧠 Memory Management & Performance
- Retain cycle detection and weak/unowned reference usage
- @MainActor usage for UI updates and thread safety
- Async/await implementation and Task management
- Network request efficiency and caching strategies

## 🎨 SwiftUI & Modern iOS Development
- State management best practices (@Observable vs @StateObject)
- Navigation patterns (NavigationStack, NavigationSplitView)
- Modern iOS 17+ feature adoption

## 🔒 Security & Privacy Compliance
- Data encryption and Keychain usage
- Input validation and sanitization
- Network security (certificate pinning, ATS)
- Privacy compliance (data collection, tracking)

## ♿ Accessibility & Inclusivity
- VoiceOver support and accessibility labels
- Dynamic Type implementation
- Touch target size compliance (44pt minimum)

## 🧪 Testing & Quality Assurance
- Unit test coverage and quality
- UI test implementation for critical flows
- Edge case and error scenario coverage

## 📱 iOS Platform Compliance
- Human Interface Guidelines adherence
- App Store submission readiness
- iOS version support strategy

## ⚡ Action Items & Recommendations
### 🔴 **Critical Issues** (Must Fix Before Merge)
### 🟡 **Important Improvements** (Should Address Soon)
### 🟢 **Enhancement Opportunities** (Future Considerations)

## 🎯 Overall Assessment
- **Code Quality Score**: X/10
- **iOS Compliance Score**: X/10
- **Security Score**: X/10
- **Accessibility Score**: X/10
- **Merge Readiness**: ✅ Ready / ⚠️ Needs Minor Changes / ❌ Major Revisions Required

Format as **clear Markdown** with bullet points and specific code examples where helpful.
Focus on actionable feedback that will improve the iOS app's quality, security, and user experience."#,
        count = files.len(),
        list = file_list(files),
    )
}

/// Wrap generated summary content in the fixed posted-comment template.
pub fn wrap_summary(content: &str, commit_sha: &str) -> String {
    let short_sha: String = commit_sha.chars().take(7).collect();
    format!(
        r#"# 🤖 AI Code Review Summary

{content}

---
> 💡 **Note**: This analysis was generated by AI and should be reviewed by human developers.
>
> 🔍 **Inline Comments**: Check individual file diffs for detailed line-by-line feedback.
>
> 📅 **Generated**: {short_sha}"#
    )
}

/// Fallback body used when the summary model call itself fails: the file
/// list plus the encountered error.
pub fn fallback_summary(files: &[ChangedFile], error: &str) -> String {
    format!(
        r#"## 🏗️ AI Architectural Analysis

**Note**: Error occurred during analysis generation.

### Files Reviewed
{list}

### Status
Analysis could not be completed due to: {error}

Please review the inline comments for detailed feedback on individual files."#,
        list = file_list(files),
    )
}

/// Minimal summary posted when the full summary post keeps failing.
pub fn simplified_summary(files: &[ChangedFile]) -> String {
    let names = files
        .iter()
        .map(|f| format!("• {}", f.filename))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"## 🏗️ AI Code Review Summary

**Files Reviewed**: {count} files
{names}

**Status**: Analysis completed with rate limiting. Check inline comments for specific feedback.

*Note: Simplified summary due to API limitations.*"#,
        count = files.len(),
    )
}

/// Posted when filtering leaves no reviewable files in the pull request.
pub const NO_REVIEWABLE_FILES_SUMMARY: &str = r#"## 🏗️ AI Code Review Summary

**Status**: No reviewable code files found in this PR.

The PR may contain only:
- Binary files (images, assets)
- Configuration files
- Documentation files

No code review comments were generated."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FileCategory;
    use crate::github::FileStatus;

    fn sample_files() -> Vec<ChangedFile> {
        vec![
            ChangedFile {
                filename: "Sources/ContentView.swift".to_string(),
                status: FileStatus::Modified,
                patch: None,
                additions: 12,
                deletions: 3,
            },
            ChangedFile {
                filename: "Sources/Model.swift".to_string(),
                status: FileStatus::Added,
                patch: None,
                additions: 40,
                deletions: 0,
            },
        ]
    }

    #[test]
    fn test_system_message_varies_by_category() {
        let swiftui = system_message(FileCategory::SwiftUi);
        let uikit = system_message(FileCategory::UiKit);
        assert!(swiftui.contains("SWIFTUI SPECIFIC GUIDELINES"));
        assert!(uikit.contains("UIKIT SPECIFIC GUIDELINES"));
        assert!(swiftui.starts_with("You are a senior iOS developer"));
        assert!(uikit.starts_with("You are a senior iOS developer"));
    }

    #[test]
    fn test_inline_message_includes_valid_lines() {
        let ctx = crate::classify::ContextInfo::default();
        let msg = inline_user_message(
            "Foo.swift",
            FileCategory::Swift,
            &ctx,
            &[3, 11, 12],
            "Line 3: let x = 1",
            5,
        );
        assert!(msg.contains("Valid line numbers for comments: [3, 11, 12]"));
        assert!(msg.contains("Maximum 5 comments"));
        assert!(msg.contains("Line 3: let x = 1"));
    }

    #[test]
    fn test_summary_prompt_lists_files() {
        let prompt = summary_prompt(&sample_files());
        assert!(prompt.contains("**Files Changed (2 files):**"));
        assert!(prompt.contains("- Sources/ContentView.swift (+12/-3 lines)"));
    }

    #[test]
    fn test_wrap_summary_truncates_sha() {
        let wrapped = wrap_summary("body", "0123456789abcdef");
        assert!(wrapped.contains("**Generated**: 0123456"));
        assert!(wrapped.starts_with("# 🤖 AI Code Review Summary"));
    }

    #[test]
    fn test_fallback_summary_names_error() {
        let body = fallback_summary(&sample_files(), "connection reset");
        assert!(body.contains("connection reset"));
        assert!(body.contains("Sources/Model.swift"));
    }
}
