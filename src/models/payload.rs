//! 固定上传内容
//!
//! 每个新建工程最终要写入的两个文件：服务端脚本和工程清单。
//! 内容是常量，但以函数形式构造并显式传给上传器，不做模块级可变状态。

use crate::api::types::{FileType, ScriptFile};

/// 服务端脚本：清理旧触发器并安装 GetandSetProperty 库的 onEdit 触发器
const SCRIPT_SOURCE: &str = r#"function install() {
  var triggers = ScriptApp.getProjectTriggers();
  for (var i = 0; i < triggers.length; i++) {
    ScriptApp.deleteTrigger(triggers[i]);
  }
  ScriptApp.newTrigger('GetandSetProperty.locationOnEdit').forSpreadsheet(SpreadsheetApp.getActive()).onEdit().create();
  ScriptApp.newTrigger('GetandSetProperty.lithOnEdit').forSpreadsheet(SpreadsheetApp.getActive()).onEdit().create();
  // getCoreLogging();
  var ss = SpreadsheetApp.getActiveSpreadsheet()
  ss.deleteActiveSheet();
  //Browser.msgBox("Installed sucessfully");
  // PropertiesService.getScriptProperties().setProperty('key', 'installed correctly');
}"#;

/// 工程清单（appsscript.json）：时区、高级服务、依赖库、日志、权限范围、运行时
const MANIFEST_SOURCE: &str = r#"{
  "timeZone": "Australia/Adelaide",
  "dependencies": {
    "enabledAdvancedServices": [
      {
        "userSymbol": "Drive",
        "serviceId": "drive",
        "version": "v2"
      }
    ],
    "libraries": [
      {
        "userSymbol": "GetandSetProperty",
        "version": "0",
        "libraryId": "15eHrt4uWZP1Gy2b2xJ_alHWIHtnUOoOKmOnLVuta40P9SdxSHqhbFjb8",
        "developmentMode": true
      }
    ]
  },
  "exceptionLogging": "STACKDRIVER",
  "oauthScopes": [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/script.container.ui",
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/script.external_request",
    "https://www.googleapis.com/auth/script.scriptapp"
  ],
  "runtimeVersion": "V8"
}"#;

/// 构造要写入工程的完整文件集合
///
/// # 返回
/// 顺序固定：脚本文件在前，清单在后
pub fn project_files() -> Vec<ScriptFile> {
    vec![
        ScriptFile::new("Code", FileType::ServerJs, SCRIPT_SOURCE),
        ScriptFile::new("appsscript", FileType::Json, MANIFEST_SOURCE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_files_shape() {
        let files = project_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "Code");
        assert_eq!(files[0].file_type, FileType::ServerJs);
        assert_eq!(files[1].name, "appsscript");
        assert_eq!(files[1].file_type, FileType::Json);
    }

    #[test]
    fn test_manifest_is_valid_json() {
        let manifest: serde_json::Value = serde_json::from_str(MANIFEST_SOURCE).unwrap();
        assert_eq!(manifest["timeZone"], "Australia/Adelaide");
        assert_eq!(manifest["runtimeVersion"], "V8");
        assert_eq!(manifest["oauthScopes"].as_array().unwrap().len(), 6);
        assert_eq!(
            manifest["dependencies"]["libraries"][0]["userSymbol"],
            "GetandSetProperty"
        );
    }

    #[test]
    fn test_script_source_installs_triggers() {
        assert!(SCRIPT_SOURCE.contains("function install()"));
        assert!(SCRIPT_SOURCE.contains("GetandSetProperty.locationOnEdit"));
    }
}
