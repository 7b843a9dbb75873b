//! 单元测试模块
//! 覆盖渲染流水线、节点树、事件分发与组件清单

pub mod renderer_tests;
